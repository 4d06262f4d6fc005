//! # Unit Lifecycle Service
//!
//! Implements [`UnitLifecycleApi`] over an injected [`UnitRepository`] and
//! [`TimeSource`].
//!
//! ## Architecture
//!
//! 1. Requests are validated in the domain layer before any document is read
//! 2. Every write goes through one `UnitRepository::update` call, so a single
//!    unit is always read-modified-written atomically
//! 3. Units in a terminal status refuse further status writes
//! 4. Batch writes are atomic per unit only; missing, terminal and failed
//!    units are reported back instead of aborting the batch

use crate::domain::{
    dedupe_ids, BatchStatusOutcome, BloodUnit, IntakeRequest, LifecycleError, StatusChange,
    TransfusionInput, UnitStatus,
};
use crate::ports::{DonationLedger, TemperatureOutcome, UnitFilter, UnitLifecycleApi, UnitRepository};
use shared_types::{validate_celsius, Actor, TimeSource, UnitId};
use std::sync::Arc;

/// The unit lifecycle service.
pub struct UnitLifecycleService<R, T>
where
    R: UnitRepository,
    T: TimeSource,
{
    repository: R,
    time_source: T,
    /// Donor bookkeeping for intakes that name a donor.
    ledger: Option<Arc<dyn DonationLedger>>,
}

impl<R, T> UnitLifecycleService<R, T>
where
    R: UnitRepository,
    T: TimeSource,
{
    pub fn new(repository: R, time_source: T) -> Self {
        Self {
            repository,
            time_source,
            ledger: None,
        }
    }

    /// Check and record donations against a donor registry at intake.
    pub fn with_donation_ledger(mut self, ledger: Arc<dyn DonationLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn store_failed(&self, operation: &str, err: &LifecycleError) {
        if let LifecycleError::Store(e) = err {
            tracing::error!("[bb-02] Store failure during {}: {}", operation, e);
        }
    }
}

impl<R, T> UnitLifecycleApi for UnitLifecycleService<R, T>
where
    R: UnitRepository,
    T: TimeSource,
{
    fn intake(&self, request: IntakeRequest, actor: &Actor) -> Result<BloodUnit, LifecycleError> {
        let now = self.time_source.now();
        let intake = request.validate(now).inspect_err(|e| {
            tracing::warn!("[bb-02] Intake rejected: {}", e);
        })?;

        if let (Some(donor_id), Some(ledger)) = (&intake.donor_id, &self.ledger) {
            ledger.record_donation(donor_id, intake.blood_type, intake.collection_date)?;
        }

        let unit = intake.into_unit(UnitId::generate(), actor, now);
        self.repository
            .insert(unit.clone())
            .inspect_err(|e| self.store_failed("intake", e))?;

        tracing::info!(
            unit_id = %unit.id(),
            blood_type = %unit.blood_type(),
            quantity_ml = unit.quantity_ml(),
            actor = %actor.user_id,
            "[bb-02] 🩸 Unit received into quarantine"
        );
        Ok(unit)
    }

    fn get_unit(&self, id: &UnitId) -> Result<BloodUnit, LifecycleError> {
        self.repository
            .get(id)?
            .ok_or_else(|| LifecycleError::UnitNotFound(id.clone()))
    }

    fn list_units(&self, filter: &UnitFilter) -> Result<Vec<BloodUnit>, LifecycleError> {
        let mut units: Vec<BloodUnit> = self
            .repository
            .list()?
            .into_iter()
            .filter(|u| filter.matches(u))
            .collect();
        units.sort_by(|a, b| {
            b.collection_date()
                .cmp(&a.collection_date())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(units)
    }

    fn all_units(&self) -> Result<Vec<BloodUnit>, LifecycleError> {
        self.repository.list()
    }

    fn update_status(
        &self,
        id: &UnitId,
        status: &str,
        note: Option<String>,
        actor: &Actor,
    ) -> Result<BloodUnit, LifecycleError> {
        let change = StatusChange::parse(status, note).inspect_err(|e| {
            tracing::warn!("[bb-02] Status change for {} rejected: {}", id, e);
        })?;
        let now = self.time_source.now();

        let mut outcome = None;
        let updated = self
            .repository
            .update(id, &mut |unit| {
                unit.ensure_status_open("change status")?;
                outcome = Some(unit.apply_status(change.status, actor, change.note.clone(), now));
                Ok(())
            })
            .inspect_err(|e| self.store_failed("status update", e))?
            .ok_or_else(|| LifecycleError::UnitNotFound(id.clone()))?;

        if let Some(outcome) = outcome {
            tracing::info!(
                unit_id = %id,
                from = %outcome.previous,
                to = %outcome.current,
                actor = %actor.user_id,
                "[bb-02] Unit status updated"
            );
            if outcome.expiration_forced {
                tracing::warn!(
                    unit_id = %id,
                    "[bb-02] Expiration date moved to now by manual expiry"
                );
            }
        }
        Ok(updated)
    }

    fn batch_update_status(
        &self,
        ids: &[UnitId],
        status: &str,
        note: Option<String>,
        actor: &Actor,
    ) -> Result<BatchStatusOutcome, LifecycleError> {
        let change = StatusChange::parse(status, note)?;
        let ids = dedupe_ids(ids);
        if ids.is_empty() {
            return Err(LifecycleError::field("unitIds", "at least one unit id is required"));
        }
        let now = self.time_source.now();

        let mut outcome = BatchStatusOutcome {
            status: Some(change.status),
            ..Default::default()
        };
        // Each id is its own read-modify-write; a failure on one id does not
        // undo or stop the others.
        for id in ids {
            let written = self.repository.update(&id, &mut |unit| {
                unit.ensure_status_open("change status")?;
                unit.apply_status(change.status, actor, change.note.clone(), now);
                Ok(())
            });
            match written {
                Ok(Some(_)) => outcome.updated.push(id),
                Ok(None) => outcome.not_found.push(id),
                Err(LifecycleError::InvalidState { status, .. }) => {
                    tracing::warn!(unit_id = %id, %status, "[bb-02] Batch skipped unit in terminal status");
                    outcome.rejected.push(id);
                }
                Err(e) => {
                    tracing::error!(unit_id = %id, error = %e, "[bb-02] Batch status write failed");
                    outcome.failed.push(id);
                }
            }
        }

        tracing::info!(
            status = %change.status,
            updated = outcome.updated_count(),
            not_found = outcome.not_found_count(),
            rejected = outcome.rejected_count(),
            failed = outcome.failed_count(),
            actor = %actor.user_id,
            "[bb-02] Batch status update applied"
        );
        Ok(outcome)
    }

    fn record_transfusion(
        &self,
        id: &UnitId,
        input: TransfusionInput,
        actor: &Actor,
    ) -> Result<BloodUnit, LifecycleError> {
        let now = self.time_source.now();
        let record = input.into_record(actor, now)?;
        let note = format!("Transfused at {}", record.hospital);

        let updated = self
            .repository
            .update(id, &mut |unit| {
                if !matches!(unit.status(), UnitStatus::Available | UnitStatus::Reserved) {
                    return Err(LifecycleError::InvalidState {
                        id: id.clone(),
                        status: unit.status(),
                        operation: "record transfusion",
                    });
                }
                unit.set_transfusion(record.clone());
                unit.apply_status(UnitStatus::Transfused, actor, Some(note.clone()), now);
                Ok(())
            })
            .inspect_err(|e| self.store_failed("transfusion", e))?
            .ok_or_else(|| LifecycleError::UnitNotFound(id.clone()))?;

        tracing::info!(unit_id = %id, hospital = %record.hospital, "[bb-02] Transfusion recorded");
        Ok(updated)
    }

    fn record_temperature(
        &self,
        id: &UnitId,
        celsius: f64,
        actor: &Actor,
    ) -> Result<TemperatureOutcome, LifecycleError> {
        validate_celsius("celsius", celsius)?;
        let now = self.time_source.now();

        let mut excursion = false;
        let unit = self
            .repository
            .update(id, &mut |unit| {
                excursion = unit.record_temperature(celsius, actor, now);
                Ok(())
            })
            .inspect_err(|e| self.store_failed("temperature reading", e))?
            .ok_or_else(|| LifecycleError::UnitNotFound(id.clone()))?;

        if excursion {
            tracing::warn!(unit_id = %id, celsius, "[bb-02] 🌡️ Unit temperature excursion");
        }
        Ok(TemperatureOutcome { unit, excursion })
    }
}
