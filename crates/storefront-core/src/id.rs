//! Typed identifiers.
//!
//! Users get UUID v7 keys so ids sort by creation time. Categories and
//! products use the database's auto-increment integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserId(pub Uuid);

impl UserId {
    /// Allocates a fresh time-ordered id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Declares an id backed by an auto-increment `BIGINT` column.
macro_rules! serial_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        pub struct $name(pub i64);

        impl $name {
            /// Raw column value.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

serial_id!(
    /// Category primary key.
    CategoryId
);

serial_id!(
    /// Product primary key.
    ProductId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_ids_are_time_ordered() {
        let first = UserId::new();
        let second = UserId::new();
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn test_user_id_parsing() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(UserId::parse(raw).unwrap().to_string(), raw);
        assert!(UserId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_serial_ids_are_plain_numbers() {
        assert_eq!(ProductId(42).to_string(), "42");
        assert_eq!(CategoryId::from(7).value(), 7);
        assert_eq!(serde_json::to_string(&ProductId(3)).unwrap(), "3");
        assert_eq!(serde_json::from_str::<CategoryId>("9").unwrap(), CategoryId(9));
    }
}
