//! Grouping raw driver rows into per-table schema descriptions.

use nldb_core::{ConnectionId, QueryRows, TableRelationship};
use serde_json::Value;

/// One column as reported by the enumeration query.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared data type.
    pub data_type: String,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
    /// Whether the column is (part of) the primary key.
    pub is_primary_key: bool,
    /// Whether the column is a foreign key.
    pub is_foreign_key: bool,
    /// The table the foreign key references, if any.
    pub referenced_table: Option<String>,
    /// The column the foreign key references, if any.
    pub referenced_column: Option<String>,
}

/// One table's full column set, in the order the driver reported them.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Fully qualified table/collection name.
    pub table_name: String,
    /// Columns, in driver-reported order.
    pub columns: Vec<ColumnInfo>,
}

fn as_str(value: &Value) -> Option<String> {
    value.as_str().map(ToString::to_string)
}

fn as_bool(value: &Value) -> bool {
    value.as_bool().unwrap_or(false)
}

/// Group the enumeration query's rows into one [`TableSchema`] per distinct
/// `table_name`, first-seen order.
#[must_use]
pub fn group_by_table(rows: &QueryRows) -> Vec<TableSchema> {
    let mut tables: Vec<TableSchema> = Vec::new();

    for row in &rows.rows {
        let Some(table_name) = row.first().and_then(as_str) else {
            continue;
        };
        let column = ColumnInfo {
            name: row.get(1).and_then(as_str).unwrap_or_default(),
            data_type: row.get(2).and_then(as_str).unwrap_or_default(),
            nullable: row.get(3).is_some_and(as_bool),
            is_primary_key: row.get(4).is_some_and(as_bool),
            is_foreign_key: row.get(5).is_some_and(as_bool),
            referenced_table: row.get(6).and_then(as_str),
            referenced_column: row.get(7).and_then(as_str),
        };

        if let Some(table) = tables.iter_mut().find(|t| t.table_name == table_name) {
            table.columns.push(column);
        } else {
            tables.push(TableSchema {
                table_name,
                columns: vec![column],
            });
        }
    }

    tables
}

/// Build the stable textual description embedded for semantic search:
/// `"Table: T. Columns: c1 (type), …. Relationships: c1 -> T2.c2, …."`.
/// Equal inputs always produce an identical string.
#[must_use]
pub fn describe(table: &TableSchema) -> String {
    let columns = table
        .columns
        .iter()
        .map(|c| format!("{} ({})", c.name, c.data_type))
        .collect::<Vec<_>>()
        .join(", ");

    let relationships: Vec<String> = table
        .columns
        .iter()
        .filter(|c| c.is_foreign_key)
        .map(|c| {
            let referenced_table = c.referenced_table.as_deref().unwrap_or("?");
            let referenced_column = c.referenced_column.as_deref().unwrap_or("?");
            format!("{} -> {referenced_table}.{referenced_column}", c.name)
        })
        .collect();
    let relationships = if relationships.is_empty() {
        "none".to_string()
    } else {
        relationships.join(", ")
    };

    format!("Table: {}. Columns: {columns}. Relationships: {relationships}.", table.table_name)
}

/// Every foreign-key edge this table declares, as [`TableRelationship`]s
/// keyed by `connection_id`.
#[must_use]
pub fn foreign_key_edges(connection_id: ConnectionId, table: &TableSchema) -> Vec<TableRelationship> {
    table
        .columns
        .iter()
        .filter(|c| c.is_foreign_key)
        .filter_map(|c| {
            let referenced_table = c.referenced_table.clone()?;
            let referenced_column = c.referenced_column.clone()?;
            Some(TableRelationship {
                connection_id,
                from_table: table.table_name.clone(),
                to_table: referenced_table,
                from_column: c.name.clone(),
                to_column: referenced_column,
                relationship_kind: "foreign_key".to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_rows() -> QueryRows {
        QueryRows {
            columns: vec![
                "table_name".into(),
                "column_name".into(),
                "data_type".into(),
                "is_nullable".into(),
                "is_primary_key".into(),
                "is_foreign_key".into(),
                "referenced_table".into(),
                "referenced_column".into(),
            ],
            rows: vec![
                vec![json!("orders"), json!("id"), json!("integer"), json!(false), json!(true), json!(false), Value::Null, Value::Null],
                vec![json!("orders"), json!("customer_id"), json!("integer"), json!(false), json!(false), json!(true), json!("customers"), json!("id")],
                vec![json!("customers"), json!("id"), json!("integer"), json!(false), json!(true), json!(false), Value::Null, Value::Null],
            ],
        }
    }

    #[test]
    fn groups_rows_into_first_seen_table_order() {
        let tables = group_by_table(&sample_rows());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].table_name, "orders");
        assert_eq!(tables[0].columns.len(), 2);
        assert_eq!(tables[1].table_name, "customers");
    }

    #[test]
    fn describe_is_stable_for_equal_input() {
        let tables = group_by_table(&sample_rows());
        assert_eq!(describe(&tables[0]), describe(&tables[0].clone()));
        assert!(describe(&tables[0]).contains("customer_id -> customers.id"));
        assert_eq!(describe(&tables[1]), "Table: customers. Columns: id (integer). Relationships: none.");
    }

    #[test]
    fn foreign_key_edges_extracts_only_fk_columns() {
        let connection_id = ConnectionId::new();
        let tables = group_by_table(&sample_rows());
        let edges = foreign_key_edges(connection_id, &tables[0]);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].to_table, "customers");
    }
}
