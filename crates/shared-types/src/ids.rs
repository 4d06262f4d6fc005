//! # Identifiers
//!
//! Opaque string identifiers for every document collection. New identifiers
//! are random UUIDs with a collection prefix, so generating one never needs a
//! read of existing documents.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Prefix used for generated identifiers.
            pub const PREFIX: &'static str = $prefix;

            /// Generate a fresh identifier.
            pub fn generate() -> Self {
                Self(format!("{}-{}", $prefix, uuid::Uuid::new_v4().simple()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a blood unit document.
    UnitId,
    "BU"
);

string_id!(
    /// Identifier of a donor document.
    DonorId,
    "DN"
);

string_id!(
    /// Identifier of a cold-storage unit document.
    StorageUnitId,
    "SU"
);

string_id!(
    /// Identifier of a user account.
    UserId,
    "US"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let a = UnitId::generate();
        let b = UnitId::generate();
        assert!(a.as_str().starts_with("BU-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_transparent_serde() {
        let id = DonorId::from("DN-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"DN-1\"");
    }
}
