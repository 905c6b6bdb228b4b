//! Convenience re-exports for consumers of `nldb-schema`.

pub use crate::{
    describe, enumeration_query, foreign_key_edges, group_by_table, ColumnInfo, IngestSummary,
    SchemaIngestor, SchemaIngestorError, SchemaIngestorResult, TableSchema,
};
