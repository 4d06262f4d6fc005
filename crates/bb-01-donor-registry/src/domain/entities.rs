//! # Donor Entities
//!
//! The `Donor` document, its human-readable number and the donation
//! eligibility rule.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use shared_types::{BloodType, DonorId, Timestamp};
use std::fmt;

/// Youngest age accepted at registration.
pub const MIN_DONOR_AGE: u32 = 17;

/// Oldest age accepted at registration.
pub const MAX_DONOR_AGE: u32 = 65;

/// Minimum gap between two whole-blood donations.
pub const DONATION_INTERVAL_DAYS: i64 = 56;

/// Name of the sequence that numbers donors.
pub const DONOR_NUMBER_SEQUENCE: &str = "donor_number";

/// Sequential, human-readable donor number (`DNR-000042`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DonorNumber(pub String);

impl DonorNumber {
    pub fn from_sequence(value: u64) -> Self {
        Self(format!("DNR-{:06}", value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DonorNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completed years between `date_of_birth` and `on`.
pub fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> u32 {
    let mut years = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// A registered blood donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: DonorId,
    pub donor_number: DonorNumber,
    pub first_name: String,
    pub last_name: String,
    pub blood_type: BloodType,
    pub date_of_birth: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub registered_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_donation: Option<Timestamp>,
    pub donation_count: u32,
    pub active: bool,
}

/// Whether a donor may give blood at a given time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_eligible_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Donor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Eligibility to donate at `at`.
    pub fn eligibility(&self, at: Timestamp) -> Eligibility {
        if !self.active {
            return Eligibility {
                eligible: false,
                next_eligible_date: None,
                reason: Some("donor is inactive".to_string()),
            };
        }
        match self.last_donation {
            Some(last) if last + Duration::days(DONATION_INTERVAL_DAYS) > at => Eligibility {
                eligible: false,
                next_eligible_date: Some(last + Duration::days(DONATION_INTERVAL_DAYS)),
                reason: Some(format!(
                    "{} days must pass between donations",
                    DONATION_INTERVAL_DAYS
                )),
            },
            _ => Eligibility {
                eligible: true,
                next_eligible_date: None,
                reason: None,
            },
        }
    }

    /// Record a donation taken at `at`. Eligibility is checked by the caller.
    pub fn record_donation(&mut self, at: Timestamp) {
        self.last_donation = Some(match self.last_donation {
            Some(last) if last > at => last,
            _ => at,
        });
        self.donation_count += 1;
    }

    /// Case-insensitive match on name or donor number.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.full_name().to_lowercase().contains(&needle)
            || self.donor_number.as_str().to_lowercase().contains(&needle)
    }
}
