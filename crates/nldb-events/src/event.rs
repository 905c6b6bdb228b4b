//! Domain events published on the [`crate::EventBus`].
//!
//! These are the events the message-passing model of the orchestration core
//! publishes as it moves a turn through its components; they are observable
//! side-channels, not the request/response traffic between components
//! itself (that traffic is modeled by each component's own `ask` API).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every published event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique id of this event instance.
    pub event_id: Uuid,
    /// When the event was published.
    pub timestamp: DateTime<Utc>,
    /// Free-form source label (usually the publishing component's name).
    pub source: String,
}

impl EventMetadata {
    /// Build metadata stamped with the current time.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
        }
    }
}

/// Domain events published by the core's components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NldbEvent {
    /// A user registered a new account.
    UserRegistered {
        /// Event metadata.
        metadata: EventMetadata,
        /// The new user's id, as a string.
        user_id: String,
    },
    /// A session was created by a successful login.
    SessionCreated {
        /// Event metadata.
        metadata: EventMetadata,
        /// The new session's id, as a string.
        session_id: String,
        /// The owning user's id, as a string.
        user_id: String,
    },
    /// A session was terminated by logout or expiry.
    SessionEnded {
        /// Event metadata.
        metadata: EventMetadata,
        /// The session's id, as a string.
        session_id: String,
        /// Why the session ended ("logout" or "expired").
        reason: String,
    },
    /// A live database connection was established.
    ConnectionEstablished {
        /// Event metadata.
        metadata: EventMetadata,
        /// The connection's id, as a string.
        connection_id: String,
    },
    /// A live database connection was closed.
    ConnectionClosed {
        /// Event metadata.
        metadata: EventMetadata,
        /// The connection's id, as a string.
        connection_id: String,
    },
    /// A saved connection was soft- or hard-deleted.
    ConnectionDeleted {
        /// Event metadata.
        metadata: EventMetadata,
        /// The connection's id, as a string.
        connection_id: String,
        /// `true` for a hard delete, `false` for soft delete.
        hard: bool,
    },
    /// Schema ingestion for a connection completed.
    SchemaIngested {
        /// Event metadata.
        metadata: EventMetadata,
        /// The connection's id, as a string.
        connection_id: String,
        /// Number of schema units produced.
        unit_count: usize,
    },
    /// A turn completed with a query executed against a live connection.
    QueryExecuted {
        /// Event metadata.
        metadata: EventMetadata,
        /// The connection's id, as a string.
        connection_id: String,
        /// Whether the query was blocked by the executor's safety policy.
        blocked: bool,
    },
}

impl NldbEvent {
    /// A short, stable string identifying this event's variant.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user_registered",
            Self::SessionCreated { .. } => "session_created",
            Self::SessionEnded { .. } => "session_ended",
            Self::ConnectionEstablished { .. } => "connection_established",
            Self::ConnectionClosed { .. } => "connection_closed",
            Self::ConnectionDeleted { .. } => "connection_deleted",
            Self::SchemaIngested { .. } => "schema_ingested",
            Self::QueryExecuted { .. } => "query_executed",
        }
    }

    /// The metadata common to every event variant.
    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            Self::UserRegistered { metadata, .. }
            | Self::SessionCreated { metadata, .. }
            | Self::SessionEnded { metadata, .. }
            | Self::ConnectionEstablished { metadata, .. }
            | Self::ConnectionClosed { metadata, .. }
            | Self::ConnectionDeleted { metadata, .. }
            | Self::SchemaIngested { metadata, .. }
            | Self::QueryExecuted { metadata, .. } => metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_is_stable() {
        let event = NldbEvent::SessionCreated {
            metadata: EventMetadata::new("auth"),
            session_id: "s1".into(),
            user_id: "u1".into(),
        };
        assert_eq!(event.event_type(), "session_created");
    }
}
