//! # Blood Types
//!
//! The eight ABO/Rh combinations tracked by the inventory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight ABO/Rh blood types.
///
/// Serialized as `"A+"`, `"A-"`, ... . The Unicode minus sign (`−`) is
/// accepted on input as an alias for `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-", alias = "A−")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-", alias = "B−")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-", alias = "AB−")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-", alias = "O−")]
    ONegative,
}

impl BloodType {
    /// All blood types in display order.
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    /// Canonical label (`"AB-"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }

    /// Whether the Rh factor is negative.
    pub fn is_rh_negative(&self) -> bool {
        matches!(
            self,
            BloodType::ANegative
                | BloodType::BNegative
                | BloodType::AbNegative
                | BloodType::ONegative
        )
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the eight blood types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blood type '{0}' (expected one of A+, A-, B+, B-, AB+, AB-, O+, O-)")]
pub struct ParseBloodTypeError(pub String);

impl FromStr for BloodType {
    type Err = ParseBloodTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('−', "-").to_ascii_uppercase();
        let parsed = match normalized.as_str() {
            "A+" => BloodType::APositive,
            "A-" => BloodType::ANegative,
            "B+" => BloodType::BPositive,
            "B-" => BloodType::BNegative,
            "AB+" => BloodType::AbPositive,
            "AB-" => BloodType::AbNegative,
            "O+" => BloodType::OPositive,
            "O-" => BloodType::ONegative,
            _ => return Err(ParseBloodTypeError(s.to_string())),
        };
        Ok(parsed)
    }
}
