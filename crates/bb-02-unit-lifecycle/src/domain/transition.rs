//! # Status Transition Writer
//!
//! Validation half of a status write. A requested status is checked against
//! the six-value allow-list before any document is touched; the write itself
//! is [`BloodUnit::apply_status`](super::entities::BloodUnit::apply_status).

use super::entities::{TransfusionRecord, UnitStatus};
use super::errors::LifecycleError;
use serde::{Deserialize, Serialize};
use shared_types::{Actor, FieldErrors, Timestamp, UnitId};
use std::collections::HashSet;

/// Longest note accepted on a history entry.
pub const MAX_NOTE_LEN: usize = 1_000;

/// A validated status change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: UnitStatus,
    pub note: Option<String>,
}

impl StatusChange {
    /// Validate a raw `{status, notes}` request.
    pub fn parse(status: &str, note: Option<String>) -> Result<Self, LifecycleError> {
        let mut errors = FieldErrors::new();

        let parsed = match status.parse::<UnitStatus>() {
            Ok(s) => Some(s),
            Err(e) => {
                errors.add("status", e.to_string());
                None
            }
        };
        let note = match normalize_note(note) {
            Ok(n) => n,
            Err(e) => {
                errors.extend(e);
                None
            }
        };

        match parsed {
            Some(status) if errors.is_empty() => Ok(Self { status, note }),
            _ => Err(LifecycleError::Validation(errors)),
        }
    }
}

/// Trim a note; blank notes become `None`.
pub fn normalize_note(note: Option<String>) -> Result<Option<String>, FieldErrors> {
    let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    if let Some(n) = &note {
        if n.chars().count() > MAX_NOTE_LEN {
            return Err(FieldErrors::single(
                "notes",
                format!("must be at most {} characters", MAX_NOTE_LEN),
            ));
        }
    }
    Ok(note)
}

/// Remove repeated identifiers, keeping first occurrence order.
pub fn dedupe_ids(ids: &[UnitId]) -> Vec<UnitId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Result of a batch status write.
///
/// Every distinct requested identifier appears in exactly one of the lists.
/// `rejected` holds units already in a terminal status; `failed` holds units
/// whose write hit a store error and were left as they were.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusOutcome {
    pub status: Option<UnitStatus>,
    pub updated: Vec<UnitId>,
    pub not_found: Vec<UnitId>,
    #[serde(default)]
    pub rejected: Vec<UnitId>,
    #[serde(default)]
    pub failed: Vec<UnitId>,
}

impl BatchStatusOutcome {
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    pub fn not_found_count(&self) -> usize {
        self.not_found.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// True when every requested unit was written.
    pub fn is_complete(&self) -> bool {
        self.not_found.is_empty() && self.rejected.is_empty() && self.failed.is_empty()
    }
}

/// Transfusion details as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransfusionInput {
    pub recipient_ref: String,
    pub hospital: String,
    pub physician: String,
    /// Defaults to "now" when absent.
    pub transfused_at: Option<Timestamp>,
}

impl TransfusionInput {
    /// Validate and build the record to attach to the unit.
    pub fn into_record(self, actor: &Actor, now: Timestamp) -> Result<TransfusionRecord, LifecycleError> {
        let mut errors = FieldErrors::new();
        let recipient_ref = required(&mut errors, "recipientRef", self.recipient_ref);
        let hospital = required(&mut errors, "hospital", self.hospital);
        let physician = required(&mut errors, "physician", self.physician);
        let transfused_at = self.transfused_at.unwrap_or(now);
        if transfused_at > now {
            errors.add("transfusedAt", "cannot be in the future");
        }
        errors.into_result()?;

        Ok(TransfusionRecord {
            recipient_ref,
            hospital,
            physician,
            transfused_at,
            recorded_by: actor.clone(),
        })
    }
}

fn required(errors: &mut FieldErrors, field: &str, value: String) -> String {
    let value = value.trim().to_string();
    if value.is_empty() {
        errors.add(field, "is required");
    }
    value
}
