//! Prompt construction for query synthesis.

use nldb_core::DatabaseKind;

/// One table the synthesizer is permitted to reference.
#[derive(Debug, Clone)]
pub struct ContextTable {
    /// Qualified table/collection name.
    pub name: String,
    /// Column names, in schema order.
    pub columns: Vec<String>,
    /// Human-readable relationship descriptions, e.g. `"customer_id ->
    /// customers.id"`.
    pub relationships: Vec<String>,
}

fn dialect_name(kind: DatabaseKind) -> &'static str {
    match kind {
        DatabaseKind::Postgres => "PostgreSQL",
        DatabaseKind::MySql => "MySQL",
        DatabaseKind::MongoDb => "MongoDB's aggregation pipeline, expressed as JSON",
    }
}

/// Build the synthesis prompt. When `context` is empty the model is
/// explicitly permitted to produce a schema-discovery query instead of
/// inventing table names.
#[must_use]
pub fn synthesis_prompt(user_text: &str, kind: DatabaseKind, context: &[ContextTable]) -> String {
    let dialect = dialect_name(kind);

    if context.is_empty() {
        return format!(
            "You translate natural-language questions into {dialect} queries. No schema \
             context is available for this request. Produce a schema-discovery query (e.g. \
             listing the available tables/collections) rather than inventing table names. \
             Respond with a JSON object of the form {{\"query\": \"...\", \"explanation\": \
             \"...\"}} and nothing else.\n\nQuestion: {user_text}"
        );
    }

    let tables = context
        .iter()
        .map(|t| {
            let columns = t.columns.join(", ");
            let relationships = if t.relationships.is_empty() {
                "none".to_string()
            } else {
                t.relationships.join(", ")
            };
            format!("- {} (columns: {columns}; relationships: {relationships})", t.name)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You translate natural-language questions into {dialect} queries. You may only \
         reference the following tables/collections and their listed columns; never invent \
         a table name that is not listed:\n{tables}\n\nRespond with a JSON object of the form \
         {{\"query\": \"...\", \"explanation\": \"...\"}} and nothing else.\n\nQuestion: {user_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_permits_schema_discovery() {
        let prompt = synthesis_prompt("what tables exist?", DatabaseKind::Postgres, &[]);
        assert!(prompt.contains("schema-discovery"));
    }

    #[test]
    fn non_empty_context_lists_every_table() {
        let context = vec![ContextTable {
            name: "orders".to_string(),
            columns: vec!["id".to_string(), "amount".to_string()],
            relationships: vec!["customer_id -> customers.id".to_string()],
        }];
        let prompt = synthesis_prompt("list big orders", DatabaseKind::MySql, &context);
        assert!(prompt.contains("orders"));
        assert!(prompt.contains("customer_id -> customers.id"));
        assert!(prompt.contains("MySQL"));
    }
}
