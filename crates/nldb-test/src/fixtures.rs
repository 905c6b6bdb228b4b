//! Fixture builders for the shared data model.
//!
//! Every fixture returns a fully populated, valid record so tests only need
//! to override the one or two fields relevant to what they're checking.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use nldb_core::{
    ConnectionId, ConversationTurn, DatabaseKind, RequestId, Role, SavedConnection, SchemaUnit,
    Session, SessionId, SessionStatus, TableRelationship, User, UserId,
};

/// Build a test user with a deterministic-looking username and a throwaway
/// password hash (not a real `nldb_crypto::PasswordHash`, since most callers
/// don't need one).
#[must_use]
pub fn test_user(username: &str) -> User {
    User {
        id: UserId::new(),
        username: username.to_string(),
        email: format!("{username}@example.test"),
        password_hash: "test-salt:test-digest".to_string(),
        role: Role::User,
        status: nldb_core::AccountStatus::Active,
        created_at: Utc::now(),
        last_login_at: None,
        failed_login_count: 0,
        locked_until: None,
    }
}

/// Build an active session for `user_id`, expiring in `ttl_minutes`.
#[must_use]
pub fn test_session(user_id: UserId, ttl_minutes: i64) -> Session {
    let now = Utc::now();
    Session {
        id: SessionId::new(),
        user_id,
        username: "alice".to_string(),
        user_agent: None,
        ip_address: None,
        created_at: now,
        accessed_at: now,
        expires_at: now + Duration::minutes(ttl_minutes),
        status: SessionStatus::Active,
    }
}

/// Build an already-expired session for `user_id`.
#[must_use]
pub fn test_expired_session(user_id: UserId) -> Session {
    let now = Utc::now();
    Session {
        id: SessionId::new(),
        user_id,
        username: "alice".to_string(),
        user_agent: None,
        ip_address: None,
        created_at: now - Duration::hours(2),
        accessed_at: now - Duration::hours(2),
        expires_at: now - Duration::hours(1),
        status: SessionStatus::Active,
    }
}

/// Build an active saved Postgres connection profile named `name` for `user_id`.
#[must_use]
pub fn test_saved_connection(user_id: UserId, name: &str) -> SavedConnection {
    SavedConnection {
        id: ConnectionId::new(),
        user_id,
        name: name.to_string(),
        kind: DatabaseKind::Postgres,
        host: "localhost".to_string(),
        port: 5432,
        database: "app".to_string(),
        username: "app".to_string(),
        password: "test-password".to_string(),
        additional_properties: HashMap::new(),
        created_at: Utc::now(),
        last_used_at: None,
        deleted_at: None,
    }
}

/// Build a table-kind schema unit for `connection_id`.
#[must_use]
pub fn test_table_unit(connection_id: ConnectionId, qualified_name: &str) -> SchemaUnit {
    SchemaUnit {
        id: format!("{qualified_name}#table"),
        connection_id,
        qualified_name: qualified_name.to_string(),
        unit_kind: "table".to_string(),
        data_type: None,
        description: format!("table {qualified_name}"),
    }
}

/// Build a column-kind schema unit under `qualified_name`.
#[must_use]
pub fn test_column_unit(connection_id: ConnectionId, qualified_name: &str, data_type: &str) -> SchemaUnit {
    SchemaUnit {
        id: format!("{qualified_name}#column"),
        connection_id,
        qualified_name: qualified_name.to_string(),
        unit_kind: "column".to_string(),
        data_type: Some(data_type.to_string()),
        description: format!("column {qualified_name} ({data_type})"),
    }
}

/// Build a foreign-key relationship between two tables.
#[must_use]
pub fn test_relationship(
    connection_id: ConnectionId,
    from_table: &str,
    to_table: &str,
) -> TableRelationship {
    TableRelationship {
        connection_id,
        from_table: from_table.to_string(),
        to_table: to_table.to_string(),
        from_column: "id".to_string(),
        to_column: format!("{from_table}_id"),
        relationship_kind: "foreign_key".to_string(),
    }
}

/// Build a not-yet-completed query-intent conversation turn.
#[must_use]
pub fn test_turn(session_id: SessionId, user_message: &str) -> ConversationTurn {
    ConversationTurn {
        request_id: RequestId::new(),
        session_id,
        user_message: user_message.to_string(),
        assistant_message: None,
        query_intent: true,
        context_tables: Vec::new(),
        generated_query: None,
        query_result: None,
        error: None,
        started_at: Utc::now(),
        completed_at: None,
    }
}
