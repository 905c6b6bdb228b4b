//! Per-kind connection string construction, preserving `additional_properties`
//! as query parameters.

use std::collections::HashMap;

use nldb_core::DatabaseKind;

/// Check the preconditions a connection attempt must satisfy before a driver
/// is opened: every field non-empty and `port` non-zero. `name` is `None`
/// for callers (`test`) that never persist a profile and so have none.
///
/// # Errors
///
/// Returns a description of the first failing field.
pub fn validate(
    name: Option<&str>,
    host: &str,
    database: &str,
    username: &str,
    password: &str,
    port: u16,
) -> Result<(), String> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err("connection name must not be empty".to_string());
        }
    }
    if host.trim().is_empty() {
        return Err("host must not be empty".to_string());
    }
    if database.trim().is_empty() {
        return Err("database name must not be empty".to_string());
    }
    if username.trim().is_empty() {
        return Err("username must not be empty".to_string());
    }
    if password.is_empty() {
        return Err("password must not be empty".to_string());
    }
    if port == 0 {
        return Err("port must be greater than 0".to_string());
    }
    Ok(())
}

/// Build the connection string `DriverFactory::open` receives for `kind`.
#[must_use]
pub fn build(
    kind: DatabaseKind,
    host: &str,
    port: u16,
    database: &str,
    additional_properties: &HashMap<String, String>,
) -> String {
    let scheme = match kind {
        DatabaseKind::Postgres => "postgres",
        DatabaseKind::MySql => "mysql",
        DatabaseKind::MongoDb => "mongodb",
    };
    let mut url = format!("{scheme}://{host}:{port}/{database}");
    if !additional_properties.is_empty() {
        let mut keys: Vec<&String> = additional_properties.keys().collect();
        keys.sort();
        let query = keys
            .into_iter()
            .map(|k| format!("{k}={}", additional_properties[k]))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_postgres_url_without_extra_properties() {
        let url = build(DatabaseKind::Postgres, "localhost", 5432, "app", &HashMap::new());
        assert_eq!(url, "postgres://localhost:5432/app");
    }

    #[test]
    fn preserves_additional_properties_as_query_params() {
        let mut props = HashMap::new();
        props.insert("sslmode".to_string(), "require".to_string());
        let url = build(DatabaseKind::MongoDb, "db.example.com", 27017, "orders", &props);
        assert_eq!(url, "mongodb://db.example.com:27017/orders?sslmode=require");
    }

    #[test]
    fn sorts_multiple_properties_for_deterministic_output() {
        let mut props = HashMap::new();
        props.insert("b".to_string(), "2".to_string());
        props.insert("a".to_string(), "1".to_string());
        let url = build(DatabaseKind::MySql, "h", 3306, "d", &props);
        assert_eq!(url, "mysql://h:3306/d?a=1&b=2");
    }

    #[test]
    fn validate_accepts_complete_parameters() {
        assert!(validate(Some("pg"), "localhost", "app", "user", "pw", 5432).is_ok());
        assert!(validate(None, "localhost", "app", "user", "pw", 5432).is_ok());
    }

    #[test]
    fn validate_rejects_an_empty_or_blank_name_when_one_is_required() {
        assert!(validate(Some(""), "h", "d", "u", "p", 1).is_err());
        assert!(validate(Some("   "), "h", "d", "u", "p", 1).is_err());
        assert!(validate(None, "h", "d", "u", "p", 1).is_ok());
    }

    #[test]
    fn validate_rejects_empty_host_database_username_or_password() {
        assert!(validate(Some("n"), "", "d", "u", "p", 1).is_err());
        assert!(validate(Some("n"), "h", "", "u", "p", 1).is_err());
        assert!(validate(Some("n"), "h", "d", "", "p", 1).is_err());
        assert!(validate(Some("n"), "h", "d", "u", "", 1).is_err());
    }

    #[test]
    fn validate_rejects_a_zero_port() {
        assert!(validate(Some("n"), "h", "d", "u", "p", 0).is_err());
    }
}
