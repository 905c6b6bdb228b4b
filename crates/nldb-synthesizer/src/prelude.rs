//! Convenience re-exports for consumers of `nldb-synthesizer`.

pub use crate::{
    ContextTable, QuerySynthesizer, SynthesisOutput, SynthesizerError, SynthesizerResult,
    DEFAULT_CALL_TIMEOUT,
};
