//! Report parameters shared by every report.

use super::errors::ReportError;
use bb_02_unit_lifecycle::BloodUnit;
use serde::{Deserialize, Serialize};
use shared_types::{BloodType, FieldErrors, Timestamp};

/// Period and blood type restriction. Bounds apply to the collection date
/// and are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
}

impl ReportFilter {
    pub fn validate(&self) -> Result<(), ReportError> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(FieldErrors::single("from", "must not be after 'to'").into());
            }
        }
        Ok(())
    }

    pub fn matches(&self, unit: &BloodUnit) -> bool {
        self.blood_type.map_or(true, |bt| unit.blood_type() == bt)
            && self.from.map_or(true, |from| unit.collection_date() >= from)
            && self.to.map_or(true, |to| unit.collection_date() <= to)
    }
}
