//! # Cold Storage Entities
//!
//! | Kind | Acceptable range |
//! |------|------------------|
//! | Refrigerator | 2 to 6 °C |
//! | Freezer | −40 to −18 °C |
//! | PlateletIncubator | 20 to 24 °C |

use serde::{Deserialize, Serialize};
use shared_types::{Actor, StorageUnitId, TemperatureReading, Timestamp};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default number of readings kept per storage unit.
pub const DEFAULT_MAX_READINGS: usize = 500;

/// Kind of cold-storage equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StorageKind {
    Refrigerator,
    Freezer,
    PlateletIncubator,
}

impl StorageKind {
    pub const ALL: [StorageKind; 3] = [
        StorageKind::Refrigerator,
        StorageKind::Freezer,
        StorageKind::PlateletIncubator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::Refrigerator => "Refrigerator",
            StorageKind::Freezer => "Freezer",
            StorageKind::PlateletIncubator => "PlateletIncubator",
        }
    }

    /// Acceptable range in °C, inclusive.
    pub fn range(&self) -> TemperatureRange {
        match self {
            StorageKind::Refrigerator => TemperatureRange::new(2.0, 6.0),
            StorageKind::Freezer => TemperatureRange::new(-40.0, -18.0),
            StorageKind::PlateletIncubator => TemperatureRange::new(20.0, 24.0),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown storage kind '{0}' (expected Refrigerator, Freezer or PlateletIncubator)")]
pub struct ParseStorageKindError(pub String);

impl FromStr for StorageKind {
    type Err = ParseStorageKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStorageKindError(s.to_string()))
    }
}

/// Inclusive temperature range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureRange {
    pub min_celsius: f64,
    pub max_celsius: f64,
}

impl TemperatureRange {
    pub const fn new(min_celsius: f64, max_celsius: f64) -> Self {
        Self {
            min_celsius,
            max_celsius,
        }
    }

    pub fn contains(&self, celsius: f64) -> bool {
        celsius >= self.min_celsius && celsius <= self.max_celsius
    }

    /// Distance outside the range; zero when inside.
    pub fn deviation(&self, celsius: f64) -> f64 {
        if celsius < self.min_celsius {
            self.min_celsius - celsius
        } else if celsius > self.max_celsius {
            celsius - self.max_celsius
        } else {
            0.0
        }
    }
}

/// Operational state of a storage unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageStatus {
    #[default]
    Operational,
    Maintenance,
    OutOfService,
}

/// A refrigerator, freezer or incubator holding blood products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUnit {
    pub id: StorageUnitId,
    pub name: String,
    pub facility: String,
    pub kind: StorageKind,
    pub range: TemperatureRange,
    pub capacity_units: u32,
    pub status: StorageStatus,
    /// Most recent readings, oldest first.
    #[serde(default)]
    pub readings: Vec<TemperatureReading>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StorageUnit {
    pub fn latest_reading(&self) -> Option<&TemperatureReading> {
        self.readings.last()
    }

    /// Append a reading, dropping the oldest beyond `max_readings`.
    /// Returns whether the reading is an excursion.
    pub fn record_reading(
        &mut self,
        celsius: f64,
        actor: &Actor,
        now: Timestamp,
        max_readings: usize,
    ) -> bool {
        let excursion = !self.range.contains(celsius);
        self.readings.push(TemperatureReading {
            celsius,
            recorded_at: now,
            recorded_by: actor.clone(),
            excursion,
        });
        if self.readings.len() > max_readings {
            let overflow = self.readings.len() - max_readings;
            self.readings.drain(..overflow);
        }
        self.updated_at = now;
        excursion
    }

    /// Alert for the latest reading, if it is out of range.
    pub fn alert(&self) -> Option<StorageAlert> {
        let latest = self.latest_reading()?;
        if !latest.excursion {
            return None;
        }
        Some(StorageAlert {
            storage_unit_id: self.id.clone(),
            name: self.name.clone(),
            facility: self.facility.clone(),
            kind: self.kind,
            status: self.status,
            celsius: latest.celsius,
            recorded_at: latest.recorded_at,
            range: self.range,
            deviation: self.range.deviation(latest.celsius),
        })
    }
}

/// A storage unit whose latest reading is out of range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAlert {
    pub storage_unit_id: StorageUnitId,
    pub name: String,
    pub facility: String,
    pub kind: StorageKind,
    pub status: StorageStatus,
    pub celsius: f64,
    pub recorded_at: Timestamp,
    pub range: TemperatureRange,
    pub deviation: f64,
}
