//! Merges `VectorIndex` and `GraphIndex` hits into the `ContextTable` list
//! `QuerySynthesizer` renders into its prompt.
//!
//! Split out from [`crate::orchestrator`] so the merge/dedup/cap logic can be
//! tested without standing up an async pipeline.

use nldb_synthesizer::ContextTable;
use nldb_vector::VectorPayload;

/// Build the context table list for one turn.
///
/// `vector_hits` are the top-K semantically relevant tables, most similar
/// first. `graph_related` pairs each vector hit's table name (the seed) with
/// the tables reachable from it within the configured hop depth, closest
/// first. Tables are deduplicated by name, vector hits take priority over
/// graph-only tables, and the result is capped at `max_tables`.
pub fn merge(
    vector_hits: &[(VectorPayload, f32)],
    graph_related: &[(String, Vec<(String, usize)>)],
    max_tables: usize,
) -> Vec<ContextTable> {
    let mut tables: Vec<ContextTable> = Vec::new();

    for (payload, _score) in vector_hits {
        if tables.iter().any(|t| t.name == payload.table_name) {
            continue;
        }
        tables.push(ContextTable {
            name: payload.table_name.clone(),
            columns: vec![payload.description.clone()],
            relationships: Vec::new(),
        });
    }

    for (seed, related) in graph_related {
        for (name, distance) in related {
            if let Some(existing) = tables.iter_mut().find(|t| &t.name == name) {
                existing
                    .relationships
                    .push(format!("{distance} hop(s) from {seed}"));
                continue;
            }
            if tables.len() >= max_tables {
                continue;
            }
            tables.push(ContextTable {
                name: name.clone(),
                columns: Vec::new(),
                relationships: vec![format!("{distance} hop(s) from {seed}")],
            });
        }
    }

    tables.truncate(max_tables);
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use nldb_core::{ConnectionId, UserId};

    fn payload(table_name: &str) -> VectorPayload {
        VectorPayload {
            user_id: UserId::new(),
            connection_id: ConnectionId::new(),
            table_name: table_name.to_string(),
            description: format!("Table: {table_name}."),
        }
    }

    #[test]
    fn vector_hits_come_first_and_keep_their_description() {
        let hits = vec![(payload("orders"), 0.9)];
        let result = merge(&hits, &[], 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "orders");
        assert_eq!(result[0].columns, vec!["Table: orders.".to_string()]);
    }

    #[test]
    fn graph_tables_already_present_gain_a_relationship_note_instead_of_duplicating() {
        let hits = vec![(payload("orders"), 0.9)];
        let related = vec![("orders".to_string(), vec![("orders".to_string(), 0)])];
        let result = merge(&hits, &related, 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].relationships, vec!["0 hop(s) from orders".to_string()]);
    }

    #[test]
    fn graph_only_tables_are_appended_with_no_columns() {
        let hits = vec![(payload("orders"), 0.9)];
        let related = vec![("orders".to_string(), vec![("customers".to_string(), 1)])];
        let result = merge(&hits, &related, 10);
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].name, "customers");
        assert!(result[1].columns.is_empty());
        assert_eq!(result[1].relationships, vec!["1 hop(s) from orders".to_string()]);
    }

    #[test]
    fn result_is_capped_at_max_tables() {
        let hits = vec![(payload("a"), 0.9), (payload("b"), 0.8)];
        let result = merge(&hits, &[], 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "a");
    }

    #[test]
    fn graph_only_tables_beyond_the_cap_are_dropped() {
        let hits = vec![(payload("orders"), 0.9)];
        let related = vec![(
            "orders".to_string(),
            vec![("customers".to_string(), 1), ("products".to_string(), 1)],
        )];
        let result = merge(&hits, &related, 1);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "orders");
    }
}
