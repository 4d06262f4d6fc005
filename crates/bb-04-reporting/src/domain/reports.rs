//! # Report Payloads
//!
//! Pure builders over a snapshot of units. Each takes "now" explicitly so
//! reports are reproducible.
//!
//! | Report | Unit population |
//! |--------|-----------------|
//! | Dashboard | every unit; supply and expiry use `Available` only |
//! | Expiry tracking | `Available` units |
//! | Distribution | units collected in the period |
//! | Inventory | units collected in the period |
//! | Wastage | units collected in the period |

use super::filter::ReportFilter;
use super::grouping::{group_count, GroupBy, GroupCount};
use super::metrics::{
    days_of_supply, percent, shortage_level, shortage_threshold, wastage_rate, ShortageLevel,
    USAGE_WINDOW_DAYS,
};
use bb_02_unit_lifecycle::{
    days_until_expiry, BloodUnit, ExpiryBuckets, TierCounts, UnitStatus, EXPIRY_HORIZON_DAYS,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use shared_types::{BloodType, Timestamp};
use std::collections::BTreeMap;

/// When a unit was transfused, if it was.
pub fn transfused_at(unit: &BloodUnit) -> Option<Timestamp> {
    if unit.status() != UnitStatus::Transfused {
        return None;
    }
    unit.transfusion()
        .map(|t| t.transfused_at)
        .or_else(|| unit.last_entered(UnitStatus::Transfused))
}

fn is_available(unit: &BloodUnit) -> bool {
    unit.status() == UnitStatus::Available
}

fn is_wasted(unit: &BloodUnit) -> bool {
    matches!(unit.status(), UnitStatus::Expired | UnitStatus::Discarded)
}

/// Transfusions in the trailing usage window ending at `now`.
fn transfused_in_window<'a>(units: impl IntoIterator<Item = &'a BloodUnit>, now: Timestamp) -> usize {
    let start = now - Duration::days(USAGE_WINDOW_DAYS);
    units
        .into_iter()
        .filter_map(transfused_at)
        .filter(|at| *at > start && *at <= now)
        .count()
}

/// Available units expiring within the outer horizon, not yet expired.
fn expiring_within_horizon<'a>(units: impl IntoIterator<Item = &'a BloodUnit>, now: Timestamp) -> usize {
    units
        .into_iter()
        .map(|u| days_until_expiry(u.expiration_date(), now))
        .filter(|days| *days > 0 && *days <= EXPIRY_HORIZON_DAYS)
        .count()
}

// =============================================================================
// Dashboard
// =============================================================================

/// Stock and supply level of one blood type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyLine {
    pub blood_type: BloodType,
    pub available: usize,
    pub threshold: u32,
    pub level: ShortageLevel,
    pub days_of_supply: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub generated_at: Timestamp,
    pub total_units: usize,
    pub available_units: usize,
    pub status_counts: Vec<GroupCount>,
    /// One line per blood type, in blood type order.
    pub supply: Vec<SupplyLine>,
    pub critical_shortages: Vec<BloodType>,
    /// Expiry tiers of available units.
    pub expiring: TierCounts,
    pub expiring_this_month: usize,
    pub transfusions_last_30_days: usize,
    /// Wastage of units collected in the last 30 days.
    pub wastage_rate_last_30_days: f64,
}

impl DashboardSummary {
    pub fn build(units: &[BloodUnit], now: Timestamp) -> Self {
        let available: Vec<&BloodUnit> = units.iter().filter(|u| is_available(u)).collect();

        let supply: Vec<SupplyLine> = BloodType::ALL
            .into_iter()
            .map(|bt| {
                let stock = available.iter().filter(|u| u.blood_type() == bt).count();
                let used = transfused_in_window(units.iter().filter(|u| u.blood_type() == bt), now);
                SupplyLine {
                    blood_type: bt,
                    available: stock,
                    threshold: shortage_threshold(bt),
                    level: shortage_level(bt, stock),
                    days_of_supply: days_of_supply(stock, used),
                }
            })
            .collect();
        let critical_shortages = supply
            .iter()
            .filter(|line| line.level == ShortageLevel::Critical)
            .map(|line| line.blood_type)
            .collect();

        let window_start = now - Duration::days(USAGE_WINDOW_DAYS);
        let recent: Vec<&BloodUnit> = units
            .iter()
            .filter(|u| u.collection_date() > window_start && u.collection_date() <= now)
            .collect();
        let recent_wasted = recent.iter().filter(|u| is_wasted(u)).count();

        Self {
            generated_at: now,
            total_units: units.len(),
            available_units: available.len(),
            status_counts: group_count(units, GroupBy::Status),
            supply,
            critical_shortages,
            expiring: ExpiryBuckets::partition(available.iter().copied(), now).counts(),
            expiring_this_month: expiring_within_horizon(available.iter().copied(), now),
            transfusions_last_30_days: transfused_in_window(units, now),
            wastage_rate_last_30_days: wastage_rate(recent_wasted, recent.len()),
        }
    }
}

// =============================================================================
// Expiry tracking
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryTrackingReport {
    pub generated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<BloodType>,
    pub counts: TierCounts,
    pub by_blood_type: BTreeMap<BloodType, TierCounts>,
    pub expiring_this_month: usize,
    pub buckets: ExpiryBuckets,
}

impl ExpiryTrackingReport {
    pub fn build(units: &[BloodUnit], now: Timestamp, blood_type: Option<BloodType>) -> Self {
        let available: Vec<&BloodUnit> = units
            .iter()
            .filter(|u| is_available(u))
            .filter(|u| blood_type.map_or(true, |bt| u.blood_type() == bt))
            .collect();
        let buckets = ExpiryBuckets::partition(available.iter().copied(), now);

        Self {
            generated_at: now,
            blood_type,
            counts: buckets.counts(),
            by_blood_type: buckets.counts_by_blood_type(),
            expiring_this_month: expiring_within_horizon(available.iter().copied(), now),
            buckets,
        }
    }
}

// =============================================================================
// Blood type distribution
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub blood_type: BloodType,
    pub total: usize,
    pub available: usize,
    pub quantity_ml: u64,
    /// Share of all units in the period, two decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodTypeDistribution {
    pub generated_at: Timestamp,
    pub filter: ReportFilter,
    pub total_units: usize,
    /// Every blood type, including those with no units.
    pub entries: Vec<DistributionEntry>,
}

impl BloodTypeDistribution {
    pub fn build(units: &[BloodUnit], now: Timestamp, filter: &ReportFilter) -> Self {
        let selected: Vec<&BloodUnit> = units.iter().filter(|u| filter.matches(u)).collect();
        let total_units = selected.len();

        let entries = BloodType::ALL
            .into_iter()
            .map(|bt| {
                let of_type: Vec<&&BloodUnit> = selected.iter().filter(|u| u.blood_type() == bt).collect();
                DistributionEntry {
                    blood_type: bt,
                    total: of_type.len(),
                    available: of_type.iter().filter(|u| is_available(u)).count(),
                    quantity_ml: of_type.iter().map(|u| u64::from(u.quantity_ml())).sum(),
                    percentage: percent(of_type.len(), total_units),
                }
            })
            .collect();

        Self {
            generated_at: now,
            filter: *filter,
            total_units,
            entries,
        }
    }
}

// =============================================================================
// Inventory (grouped counts)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub generated_at: Timestamp,
    pub group_by: GroupBy,
    pub filter: ReportFilter,
    pub total_units: usize,
    pub groups: Vec<GroupCount>,
}

impl InventoryReport {
    pub fn build(units: &[BloodUnit], now: Timestamp, group_by: GroupBy, filter: &ReportFilter) -> Self {
        let selected: Vec<&BloodUnit> = units.iter().filter(|u| filter.matches(u)).collect();
        Self {
            generated_at: now,
            group_by,
            filter: *filter,
            total_units: selected.len(),
            groups: group_count(selected.iter().copied(), group_by),
        }
    }
}

// =============================================================================
// Wastage
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WastageLine {
    pub blood_type: BloodType,
    pub processed: usize,
    pub wasted: usize,
    pub wastage_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WastageReport {
    pub generated_at: Timestamp,
    pub filter: ReportFilter,
    /// Units collected in the period.
    pub processed: usize,
    pub expired: usize,
    pub discarded: usize,
    pub wasted: usize,
    /// `wasted / processed` as a percentage, two decimals.
    pub wastage_rate: f64,
    /// Blood types with at least one processed unit.
    pub by_blood_type: Vec<WastageLine>,
}

impl WastageReport {
    pub fn build(units: &[BloodUnit], now: Timestamp, filter: &ReportFilter) -> Self {
        let selected: Vec<&BloodUnit> = units.iter().filter(|u| filter.matches(u)).collect();
        let expired = selected.iter().filter(|u| u.status() == UnitStatus::Expired).count();
        let discarded = selected.iter().filter(|u| u.status() == UnitStatus::Discarded).count();
        let wasted = expired + discarded;

        let mut per_type: BTreeMap<BloodType, (usize, usize)> = BTreeMap::new();
        for unit in &selected {
            let entry = per_type.entry(unit.blood_type()).or_default();
            entry.0 += 1;
            if is_wasted(unit) {
                entry.1 += 1;
            }
        }

        Self {
            generated_at: now,
            filter: *filter,
            processed: selected.len(),
            expired,
            discarded,
            wasted,
            wastage_rate: wastage_rate(wasted, selected.len()),
            by_blood_type: per_type
                .into_iter()
                .map(|(blood_type, (processed, wasted))| WastageLine {
                    blood_type,
                    processed,
                    wasted,
                    wastage_rate: wastage_rate(wasted, processed),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared_types::{Actor, UnitId};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    /// Unit collected `age_days` ago, moved to `status` at collection time.
    fn unit(id: &str, bt: BloodType, age_days: i64, status: UnitStatus) -> BloodUnit {
        let collected = now() - Duration::days(age_days);
        let mut u = BloodUnit::collected(UnitId::from(id), bt, 450, collected, &Actor::system(), collected);
        if status != UnitStatus::Quarantined {
            u.apply_status(status, &Actor::system(), None, collected);
        }
        u
    }

    #[test]
    fn test_wastage_fifteen_percent() {
        let mut units = Vec::new();
        for i in 0..10 {
            units.push(unit(&format!("e{i}"), BloodType::OPositive, 45, UnitStatus::Expired));
        }
        for i in 0..5 {
            units.push(unit(&format!("d{i}"), BloodType::APositive, 10, UnitStatus::Discarded));
        }
        for i in 0..85 {
            units.push(unit(&format!("a{i}"), BloodType::BPositive, 5, UnitStatus::Available));
        }

        let report = WastageReport::build(&units, now(), &ReportFilter::default());
        assert_eq!(report.processed, 100);
        assert_eq!(report.expired, 10);
        assert_eq!(report.discarded, 5);
        assert_eq!(report.wastage_rate, 15.0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["wastageRate"], 15.0);
    }

    #[test]
    fn test_wastage_respects_period() {
        let units = vec![
            unit("old", BloodType::OPositive, 60, UnitStatus::Expired),
            unit("new", BloodType::OPositive, 3, UnitStatus::Available),
        ];
        let filter = ReportFilter {
            from: Some(now() - Duration::days(30)),
            to: Some(now()),
            blood_type: None,
        };
        let report = WastageReport::build(&units, now(), &filter);
        assert_eq!(report.processed, 1);
        assert_eq!(report.wastage_rate, 0.0);
    }

    #[test]
    fn test_expiry_report_counts_available_only() {
        // Shelf life 42 days: age 40 → 2 days left, 37 → 5, 32 → 10, 43 → expired.
        let units = vec![
            unit("c", BloodType::ONegative, 40, UnitStatus::Available),
            unit("w", BloodType::ONegative, 37, UnitStatus::Available),
            unit("k", BloodType::APositive, 32, UnitStatus::Available),
            unit("x", BloodType::APositive, 43, UnitStatus::Available),
            unit("r", BloodType::APositive, 40, UnitStatus::Reserved),
        ];
        let report = ExpiryTrackingReport::build(&units, now(), None);
        assert_eq!(
            report.counts,
            TierCounts { expired: 1, critical: 1, warning: 1, caution: 1 }
        );
        assert_eq!(report.counts.expiring_soon(), 3);
        assert_eq!(report.expiring_this_month, 3);

        let only_o = ExpiryTrackingReport::build(&units, now(), Some(BloodType::ONegative));
        assert_eq!(only_o.counts.expiring_soon(), 2);
        assert_eq!(only_o.counts.expired, 0);
    }

    #[test]
    fn test_dashboard_supply_and_shortages() {
        let mut units = Vec::new();
        for i in 0..45 {
            units.push(unit(&format!("o{i}"), BloodType::ONegative, 1, UnitStatus::Available));
        }
        for i in 0..12 {
            units.push(unit(&format!("a{i}"), BloodType::ANegative, 1, UnitStatus::Available));
        }
        // 3 O- transfusions in the window: 0.1 per day.
        for i in 0..3 {
            let mut u = unit(&format!("t{i}"), BloodType::ONegative, 20, UnitStatus::Available);
            u.apply_status(UnitStatus::Transfused, &Actor::system(), None, now() - Duration::days(2));
            units.push(u);
        }

        let dash = DashboardSummary::build(&units, now());
        let line = |bt| dash.supply.iter().find(|l| l.blood_type == bt).unwrap().clone();

        assert_eq!(line(BloodType::ONegative).level, ShortageLevel::Adequate);
        assert_eq!(line(BloodType::ONegative).days_of_supply, 450.0);
        assert_eq!(line(BloodType::ANegative).level, ShortageLevel::Low);
        assert_eq!(line(BloodType::ANegative).days_of_supply, 30.0);
        assert_eq!(line(BloodType::BNegative).level, ShortageLevel::Critical);
        assert_eq!(line(BloodType::BNegative).days_of_supply, 0.0);
        assert!(dash.critical_shortages.contains(&BloodType::BNegative));
        assert!(!dash.critical_shortages.contains(&BloodType::ONegative));
        assert_eq!(dash.transfusions_last_30_days, 3);
        assert_eq!(dash.available_units, 57);
    }

    #[test]
    fn test_transfused_without_record_uses_history() {
        let u = unit("t", BloodType::BPositive, 5, UnitStatus::Transfused);
        assert_eq!(transfused_at(&u), Some(now() - Duration::days(5)));
        assert_eq!(transfused_at(&unit("a", BloodType::BPositive, 5, UnitStatus::Available)), None);
    }

    #[test]
    fn test_distribution_percentages() {
        let units = vec![
            unit("1", BloodType::OPositive, 1, UnitStatus::Available),
            unit("2", BloodType::OPositive, 1, UnitStatus::Quarantined),
            unit("3", BloodType::AbPositive, 1, UnitStatus::Available),
        ];
        let dist = BloodTypeDistribution::build(&units, now(), &ReportFilter::default());
        assert_eq!(dist.entries.len(), 8);
        let o = dist.entries.iter().find(|e| e.blood_type == BloodType::OPositive).unwrap();
        assert_eq!(o.total, 2);
        assert_eq!(o.available, 1);
        assert_eq!(o.percentage, 66.67);
    }

    #[test]
    fn test_inventory_grouped_by_month() {
        let units = vec![
            unit("1", BloodType::OPositive, 1, UnitStatus::Available),
            unit("2", BloodType::OPositive, 40, UnitStatus::Available),
        ];
        let report = InventoryReport::build(&units, now(), GroupBy::Month, &ReportFilter::default());
        let keys: Vec<_> = report.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["2024-05", "2024-06"]);
        assert_eq!(report.total_units, 2);
    }
}
