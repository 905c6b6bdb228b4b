//! Per-kind schema enumeration queries. Each returns one row per
//! `(table, column)` pair: `table_name, column_name, data_type, is_nullable,
//! is_primary_key, is_foreign_key, referenced_table, referenced_column`.

use nldb_core::DatabaseKind;

/// The query `SchemaIngestor` sends to enumerate `kind`'s schema.
#[must_use]
pub fn enumeration_query(kind: DatabaseKind) -> &'static str {
    match kind {
        DatabaseKind::Postgres => {
            "SELECT table_name, column_name, data_type, is_nullable, is_primary_key, \
             is_foreign_key, referenced_table, referenced_column \
             FROM information_schema_extended \
             WHERE table_schema = 'public' \
             ORDER BY table_name, ordinal_position"
        }
        DatabaseKind::MySql => {
            "SELECT table_name, column_name, data_type, is_nullable, is_primary_key, \
             is_foreign_key, referenced_table, referenced_column \
             FROM information_schema_extended \
             WHERE table_schema = DATABASE() \
             ORDER BY table_name, ordinal_position"
        }
        DatabaseKind::MongoDb => {
            "db.getCollectionNames().map(c => db[c].schemaFields())"
        }
    }
}
