//! Shared identifier and timestamp types used across component boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(UserId, "Identifies a registered user.");
uuid_id!(SessionId, "Identifies an authenticated session.");
uuid_id!(ConnectionId, "Identifies a saved or live database connection.");
uuid_id!(RequestId, "Correlates every component hop within one turn.");
uuid_id!(TurnId, "Identifies one conversation turn.");

/// A UTC timestamp, serialized as RFC 3339.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The kind of database a [`ConnectionId`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    /// PostgreSQL.
    Postgres,
    /// MySQL / MariaDB.
    MySql,
    /// MongoDB.
    MongoDb,
}

impl DatabaseKind {
    /// Whether this kind speaks SQL (vs. a document query language).
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(self, Self::Postgres | Self::MySql)
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
            Self::MongoDb => "mongodb",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_through_string() {
        let id = UserId::new();
        let parsed: UserId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn database_kind_relational() {
        assert!(DatabaseKind::Postgres.is_relational());
        assert!(DatabaseKind::MySql.is_relational());
        assert!(!DatabaseKind::MongoDb.is_relational());
    }
}
