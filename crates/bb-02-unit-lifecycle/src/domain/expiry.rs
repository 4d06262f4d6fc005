//! # Expiry Classifier
//!
//! Buckets units by whole days remaining until their expiration date.
//!
//! | Days until expiry | Tier |
//! |-------------------|------|
//! | `≤ 0`   | Expired |
//! | `1–3`   | Critical |
//! | `4–7`   | Warning |
//! | `8–14`  | Caution |
//! | `> 14`  | not tracked |
//!
//! Days are `ceil((expiration − now) / 1 day)`, so a unit expiring in
//! 2 days and 1 second counts as 3 days and a boundary value belongs to the
//! more urgent tier.

use super::entities::BloodUnit;
use serde::{Deserialize, Serialize};
use shared_types::{BloodType, Timestamp, UnitId};
use std::collections::BTreeMap;

pub const CRITICAL_MAX_DAYS: i64 = 3;
pub const WARNING_MAX_DAYS: i64 = 7;
pub const CAUTION_MAX_DAYS: i64 = 14;

/// Outer horizon used by reports for "expiring this month".
pub const EXPIRY_HORIZON_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Urgency tier of a unit's remaining shelf life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryTier {
    Expired,
    Critical,
    Warning,
    Caution,
}

impl ExpiryTier {
    pub const ALL: [ExpiryTier; 4] = [
        ExpiryTier::Expired,
        ExpiryTier::Critical,
        ExpiryTier::Warning,
        ExpiryTier::Caution,
    ];
}

/// Whole days until `expiration`, rounded up.
pub fn days_until_expiry(expiration: Timestamp, now: Timestamp) -> i64 {
    let millis = (expiration - now).num_milliseconds();
    // Integer division truncates toward zero, which is already the ceiling
    // for negative values.
    let days = millis / MILLIS_PER_DAY;
    if millis > 0 && millis % MILLIS_PER_DAY != 0 {
        days + 1
    } else {
        days
    }
}

/// Tier for a day count, or `None` when beyond the tracked window.
pub fn classify_days(days: i64) -> Option<ExpiryTier> {
    match days {
        d if d <= 0 => Some(ExpiryTier::Expired),
        d if d <= CRITICAL_MAX_DAYS => Some(ExpiryTier::Critical),
        d if d <= WARNING_MAX_DAYS => Some(ExpiryTier::Warning),
        d if d <= CAUTION_MAX_DAYS => Some(ExpiryTier::Caution),
        _ => None,
    }
}

/// Tier for an expiration date at `now`.
pub fn classify(expiration: Timestamp, now: Timestamp) -> Option<ExpiryTier> {
    classify_days(days_until_expiry(expiration, now))
}

/// Summary of a unit placed in an expiry bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringUnit {
    pub id: UnitId,
    pub blood_type: BloodType,
    pub quantity_ml: u32,
    pub expiration_date: Timestamp,
    pub days_until_expiry: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
}

impl ExpiringUnit {
    fn from_unit(unit: &BloodUnit, days: i64) -> Self {
        Self {
            id: unit.id().clone(),
            blood_type: unit.blood_type(),
            quantity_ml: unit.quantity_ml(),
            expiration_date: unit.expiration_date(),
            days_until_expiry: days,
            facility: unit.facility().map(str::to_string),
        }
    }
}

/// Per-tier counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    pub expired: usize,
    pub critical: usize,
    pub warning: usize,
    pub caution: usize,
}

impl TierCounts {
    fn bump(&mut self, tier: ExpiryTier) {
        match tier {
            ExpiryTier::Expired => self.expired += 1,
            ExpiryTier::Critical => self.critical += 1,
            ExpiryTier::Warning => self.warning += 1,
            ExpiryTier::Caution => self.caution += 1,
        }
    }

    /// Units still usable but inside the 14-day window.
    pub fn expiring_soon(&self) -> usize {
        self.critical + self.warning + self.caution
    }
}

/// Units partitioned into expiry tiers. Each input unit lands in at most one
/// bucket; units beyond the window are only counted in `untracked`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryBuckets {
    pub expired: Vec<ExpiringUnit>,
    pub critical: Vec<ExpiringUnit>,
    pub warning: Vec<ExpiringUnit>,
    pub caution: Vec<ExpiringUnit>,
    pub untracked: usize,
}

impl ExpiryBuckets {
    /// Partition `units` at `now`. Each bucket is ordered soonest-first.
    pub fn partition<'a, I>(units: I, now: Timestamp) -> Self
    where
        I: IntoIterator<Item = &'a BloodUnit>,
    {
        let mut buckets = ExpiryBuckets::default();
        for unit in units {
            let days = days_until_expiry(unit.expiration_date(), now);
            match classify_days(days) {
                Some(tier) => buckets
                    .bucket_mut(tier)
                    .push(ExpiringUnit::from_unit(unit, days)),
                None => buckets.untracked += 1,
            }
        }
        for tier in ExpiryTier::ALL {
            buckets
                .bucket_mut(tier)
                .sort_by(|a, b| a.expiration_date.cmp(&b.expiration_date).then_with(|| a.id.cmp(&b.id)));
        }
        buckets
    }

    pub fn bucket(&self, tier: ExpiryTier) -> &[ExpiringUnit] {
        match tier {
            ExpiryTier::Expired => &self.expired,
            ExpiryTier::Critical => &self.critical,
            ExpiryTier::Warning => &self.warning,
            ExpiryTier::Caution => &self.caution,
        }
    }

    fn bucket_mut(&mut self, tier: ExpiryTier) -> &mut Vec<ExpiringUnit> {
        match tier {
            ExpiryTier::Expired => &mut self.expired,
            ExpiryTier::Critical => &mut self.critical,
            ExpiryTier::Warning => &mut self.warning,
            ExpiryTier::Caution => &mut self.caution,
        }
    }

    pub fn counts(&self) -> TierCounts {
        TierCounts {
            expired: self.expired.len(),
            critical: self.critical.len(),
            warning: self.warning.len(),
            caution: self.caution.len(),
        }
    }

    /// Tier counts split by blood type. Types with no bucketed units are absent.
    pub fn counts_by_blood_type(&self) -> BTreeMap<BloodType, TierCounts> {
        let mut grouped: BTreeMap<BloodType, TierCounts> = BTreeMap::new();
        for tier in ExpiryTier::ALL {
            for unit in self.bucket(tier) {
                grouped.entry(unit.blood_type).or_default().bump(tier);
            }
        }
        grouped
    }
}
