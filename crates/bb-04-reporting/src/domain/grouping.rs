//! # Group-By-And-Count
//!
//! Counts units along one dimension. Time dimensions bucket on the
//! collection date in UTC; weeks are ISO weeks.

use bb_02_unit_lifecycle::BloodUnit;
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Key used for units without a storage location.
pub const UNASSIGNED_FACILITY: &str = "Unassigned";

/// Dimension to group units by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    #[default]
    BloodType,
    Status,
    Facility,
    Day,
    Week,
    Month,
}

impl GroupBy {
    pub const ALL: [GroupBy; 6] = [
        GroupBy::BloodType,
        GroupBy::Status,
        GroupBy::Facility,
        GroupBy::Day,
        GroupBy::Week,
        GroupBy::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::BloodType => "bloodType",
            GroupBy::Status => "status",
            GroupBy::Facility => "facility",
            GroupBy::Day => "day",
            GroupBy::Week => "week",
            GroupBy::Month => "month",
        }
    }

    /// Bucket key of `unit` along this dimension.
    pub fn key(&self, unit: &BloodUnit) -> String {
        let collected = unit.collection_date();
        match self {
            GroupBy::BloodType => unit.blood_type().to_string(),
            GroupBy::Status => unit.status().to_string(),
            GroupBy::Facility => unit.facility().unwrap_or(UNASSIGNED_FACILITY).to_string(),
            GroupBy::Day => collected.format("%Y-%m-%d").to_string(),
            GroupBy::Week => {
                let week = collected.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            GroupBy::Month => collected.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown groupBy '{0}' (expected bloodType, status, facility, day, week or month)")]
pub struct ParseGroupByError(pub String);

impl FromStr for GroupBy {
    type Err = ParseGroupByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupBy::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseGroupByError(s.to_string()))
    }
}

/// One group of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
    pub quantity_ml: u64,
}

/// Group `units` by `group_by`. Groups are ordered by key, which is also
/// chronological for the time dimensions.
pub fn group_count<'a, I>(units: I, group_by: GroupBy) -> Vec<GroupCount>
where
    I: IntoIterator<Item = &'a BloodUnit>,
{
    let mut groups: BTreeMap<String, (usize, u64)> = BTreeMap::new();
    for unit in units {
        let entry = groups.entry(group_by.key(unit)).or_default();
        entry.0 += 1;
        entry.1 += u64::from(unit.quantity_ml());
    }
    groups
        .into_iter()
        .map(|(key, (count, quantity_ml))| GroupCount {
            key,
            count,
            quantity_ml,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_02_unit_lifecycle::UnitStatus;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use shared_types::{Actor, BloodType, LocationInput, Timestamp, UnitId};

    fn unit(id: &str, blood_type: BloodType, collected: Timestamp, facility: Option<&str>) -> BloodUnit {
        let location = LocationInput {
            facility: facility.map(str::to_string),
            ..Default::default()
        }
        .into_location()
        .unwrap();
        BloodUnit::collected(UnitId::from(id), blood_type, 450, collected, &Actor::system(), collected)
            .with_location(location)
    }

    #[test]
    fn test_group_by_blood_type() {
        let t = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let units = vec![
            unit("a", BloodType::OPositive, t, None),
            unit("b", BloodType::OPositive, t, None),
            unit("c", BloodType::ANegative, t, None),
        ];
        let groups = group_count(&units, GroupBy::BloodType);
        assert_eq!(groups.len(), 2);
        let o = groups.iter().find(|g| g.key == "O+").unwrap();
        assert_eq!(o.count, 2);
        assert_eq!(o.quantity_ml, 900);
    }

    #[test]
    fn test_time_keys() {
        let t = Utc.with_ymd_and_hms(2024, 12, 30, 15, 0, 0).unwrap();
        let u = unit("a", BloodType::BPositive, t, None);
        assert_eq!(GroupBy::Day.key(&u), "2024-12-30");
        assert_eq!(GroupBy::Week.key(&u), "2025-W01");
        assert_eq!(GroupBy::Month.key(&u), "2024-12");
    }

    #[test]
    fn test_facility_and_status_keys() {
        let t = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let u = unit("a", BloodType::BPositive, t, Some("Kumasi"));
        assert_eq!(GroupBy::Facility.key(&u), "Kumasi");
        assert_eq!(GroupBy::Status.key(&u), UnitStatus::Quarantined.as_str());
        let bare = unit("b", BloodType::BPositive, t, None);
        assert_eq!(GroupBy::Facility.key(&bare), UNASSIGNED_FACILITY);
    }

    #[test]
    fn test_parse_group_by() {
        assert_eq!("bloodType".parse::<GroupBy>().unwrap(), GroupBy::BloodType);
        assert_eq!("WEEK".parse::<GroupBy>().unwrap(), GroupBy::Week);
        assert!("hour".parse::<GroupBy>().is_err());
    }

    proptest! {
        #[test]
        fn prop_group_counts_sum_to_total(days in proptest::collection::vec(0i64..400, 0..50), dim in 0usize..6) {
            let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
            let units: Vec<BloodUnit> = days
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    let bt = BloodType::ALL[i % 8];
                    unit(&format!("u{i}"), bt, base + chrono::Duration::days(*d), None)
                })
                .collect();
            let groups = group_count(&units, GroupBy::ALL[dim]);
            prop_assert_eq!(groups.iter().map(|g| g.count).sum::<usize>(), units.len());
            prop_assert!(groups.windows(2).all(|w| w[0].key < w[1].key));
        }
    }
}
