//! Convenience re-exports for consumers of `nldb-classifier`.

pub use crate::{Classifier, ClassifierError, ClassifierResult, DEFAULT_CALL_TIMEOUT};
