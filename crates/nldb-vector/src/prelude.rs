//! Convenience re-exports for consumers of this crate.

pub use crate::{
    cosine_similarity, point_id, InMemoryVectorStore, SearchFilter, VectorError, VectorIndex,
    VectorPayload, VectorPoint, VectorResult, VectorStore, DEFAULT_TOP_K,
};
