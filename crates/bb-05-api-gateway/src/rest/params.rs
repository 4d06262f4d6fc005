//! Query-string and body field parsing with field-level errors.
//!
//! Dates accept RFC 3339 timestamps or `YYYY-MM-DD`. A bare date used as an
//! upper bound covers the whole day.

use crate::domain::{ApiError, ApiResult};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use shared_types::{BloodType, FieldErrors, Timestamp};
use std::fmt::Display;
use std::str::FromStr;

/// Which end of a period a bare date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Start,
    End,
}

pub fn parse_timestamp(value: &str, bound: DateBound) -> Result<Timestamp, String> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not an RFC 3339 timestamp or YYYY-MM-DD date", value))?;
    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    };
    Ok(date.and_time(time).and_utc())
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|ts| ts.date_naive()))
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", value))
}

/// Collects parse failures across every parameter of one request.
#[derive(Debug, Default)]
pub struct Params {
    errors: FieldErrors,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an optional value with its `FromStr`. Blank counts as absent.
    pub fn parsed<T>(&mut self, field: &str, raw: Option<&str>) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = present(raw)?;
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.add(field, e.to_string());
                None
            }
        }
    }

    /// Blood type from a query string. An unescaped `+` arrives decoded as
    /// a space (`?bloodType=O+` reads `"O "`), so a trailing space is read
    /// back as `+`.
    pub fn blood_type(&mut self, field: &str, raw: Option<&str>) -> Option<BloodType> {
        let raw = raw?;
        let restored = match raw.trim_start().strip_suffix(' ') {
            Some(prefix) if !prefix.trim().is_empty() => format!("{}+", prefix.trim()),
            _ => raw.trim().to_string(),
        };
        self.parsed(field, Some(&restored))
    }

    pub fn timestamp(&mut self, field: &str, raw: Option<&str>, bound: DateBound) -> Option<Timestamp> {
        let raw = present(raw)?;
        match parse_timestamp(raw, bound) {
            Ok(ts) => Some(ts),
            Err(e) => {
                self.errors.add(field, e);
                None
            }
        }
    }

    pub fn date(&mut self, field: &str, raw: Option<&str>) -> Option<NaiveDate> {
        let raw = present(raw)?;
        match parse_date(raw) {
            Ok(date) => Some(date),
            Err(e) => {
                self.errors.add(field, e);
                None
            }
        }
    }

    pub fn boolean(&mut self, field: &str, raw: Option<&str>) -> Option<bool> {
        let raw = present(raw)?;
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => {
                self.errors.add(field, format!("'{}' is not a boolean", raw));
                None
            }
        }
    }

    pub fn error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    /// 400 with every collected failure, if any.
    pub fn finish(self) -> ApiResult<()> {
        self.errors.into_result().map_err(ApiError::validation)
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-01T10:30:00+02:00", DateBound::Start).unwrap();
        assert_eq!(rfc, Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap());

        let start = parse_timestamp("2024-03-01", DateBound::Start).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());

        let end = parse_timestamp("2024-03-01", DateBound::End).unwrap();
        assert_eq!(end.hour(), 23);
        assert_eq!(end.date_naive(), start.date_naive());

        assert!(parse_timestamp("01/03/2024", DateBound::Start).is_err());
    }

    #[test]
    fn test_errors_collected() {
        let mut params = Params::new();
        let bt: Option<BloodType> = params.parsed("bloodType", Some("Q+"));
        let from = params.timestamp("from", Some("yesterday"), DateBound::Start);
        let blank: Option<BloodType> = params.parsed("other", Some("  "));
        assert!(bt.is_none() && from.is_none() && blank.is_none());

        let err = params.finish().unwrap_err();
        let fields = err.fields.unwrap();
        assert!(fields.contains("bloodType"));
        assert!(fields.contains("from"));
        assert!(!fields.contains("other"));
    }

    #[test]
    fn test_blood_type_plus_decoded_as_space() {
        let mut params = Params::new();
        assert_eq!(params.blood_type("bloodType", Some("O ")), Some(BloodType::OPositive));
        assert_eq!(params.blood_type("bloodType", Some("AB+")), Some(BloodType::AbPositive));
        assert_eq!(params.blood_type("bloodType", Some("A-")), Some(BloodType::ANegative));
        assert_eq!(params.blood_type("bloodType", None), None);
        assert!(params.finish().is_ok());
    }

    #[test]
    fn test_date_accepts_timestamp() {
        assert_eq!(
            parse_date("1990-06-01T00:00:00Z").unwrap(),
            NaiveDate::from_ymd_opt(1990, 6, 1).unwrap()
        );
        let mut params = Params::new();
        assert_eq!(params.boolean("active", Some("TRUE")), Some(true));
        assert!(params.finish().is_ok());
    }
}
