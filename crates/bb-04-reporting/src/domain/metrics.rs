//! # Derived Ratios and Supply Levels

use serde::{Deserialize, Serialize};
use shared_types::BloodType;

/// Trailing window for the average daily transfusion rate.
pub const USAGE_WINDOW_DAYS: i64 = 30;

/// Minimum available units per blood type before supply is critical.
pub fn shortage_threshold(blood_type: BloodType) -> u32 {
    match blood_type {
        BloodType::ONegative => 20,
        BloodType::OPositive => 30,
        BloodType::ANegative => 10,
        BloodType::APositive => 25,
        BloodType::BNegative => 8,
        BloodType::BPositive => 15,
        BloodType::AbNegative => 5,
        BloodType::AbPositive => 10,
    }
}

/// Supply level of one blood type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShortageLevel {
    Critical,
    Low,
    Adequate,
}

/// `< threshold` is critical, `< 2 × threshold` is low.
pub fn shortage_level(blood_type: BloodType, available: usize) -> ShortageLevel {
    let threshold = shortage_threshold(blood_type) as usize;
    if available < threshold {
        ShortageLevel::Critical
    } else if available < threshold * 2 {
        ShortageLevel::Low
    } else {
        ShortageLevel::Adequate
    }
}

/// `part / whole` as a percentage, two decimals. Zero when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 2)
}

/// `wasted / processed` as a percentage with two decimals. Zero when
/// nothing was processed.
pub fn wastage_rate(wasted: usize, processed: usize) -> f64 {
    percent(wasted, processed)
}

/// Available units divided by the average daily transfusions over the
/// trailing window, to one decimal.
///
/// Without recorded usage the answer is the window length when there is
/// stock and zero when there is none.
pub fn days_of_supply(available: usize, transfused_in_window: usize) -> f64 {
    if transfused_in_window == 0 {
        return if available > 0 {
            USAGE_WINDOW_DAYS as f64
        } else {
            0.0
        };
    }
    let daily = transfused_in_window as f64 / USAGE_WINDOW_DAYS as f64;
    round_to(available as f64 / daily, 1)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
