//! # Donor Registry Service
//!
//! Implements [`DonorRegistryApi`] over injected repository, sequence and
//! clock ports.

use crate::domain::{
    Donor, DonorError, DonorNumber, Eligibility, RegistrationRequest, DONOR_NUMBER_SEQUENCE,
};
use crate::ports::{DonorFilter, DonorRegistryApi, DonorRepository, SequenceGenerator};
use shared_types::{BloodType, DonorId, TimeSource, Timestamp};

/// Dependencies for [`DonorRegistryService`].
pub struct DonorRegistryDependencies<R, S, T> {
    pub repository: R,
    pub sequence: S,
    pub time_source: T,
}

/// The donor registry service.
pub struct DonorRegistryService<R, S, T>
where
    R: DonorRepository,
    S: SequenceGenerator,
    T: TimeSource,
{
    repository: R,
    sequence: S,
    time_source: T,
}

impl<R, S, T> DonorRegistryService<R, S, T>
where
    R: DonorRepository,
    S: SequenceGenerator,
    T: TimeSource,
{
    pub fn new(deps: DonorRegistryDependencies<R, S, T>) -> Self {
        Self {
            repository: deps.repository,
            sequence: deps.sequence,
            time_source: deps.time_source,
        }
    }
}

impl<R, S, T> DonorRegistryApi for DonorRegistryService<R, S, T>
where
    R: DonorRepository,
    S: SequenceGenerator,
    T: TimeSource,
{
    fn register(&self, request: RegistrationRequest) -> Result<Donor, DonorError> {
        let now = self.time_source.now();
        let valid = request.validate(now).inspect_err(|e| {
            tracing::warn!("[bb-01] Donor registration rejected: {}", e);
        })?;

        let number = self.sequence.next_value(DONOR_NUMBER_SEQUENCE).inspect_err(|e| {
            tracing::error!("[bb-01] Donor number sequence failed: {}", e);
        })?;

        let donor = Donor {
            id: DonorId::generate(),
            donor_number: DonorNumber::from_sequence(number),
            first_name: valid.first_name,
            last_name: valid.last_name,
            blood_type: valid.blood_type,
            date_of_birth: valid.date_of_birth,
            phone: valid.phone,
            email: valid.email,
            registered_at: now,
            last_donation: None,
            donation_count: 0,
            active: true,
        };
        self.repository.insert(donor.clone())?;

        tracing::info!(
            donor_id = %donor.id,
            donor_number = %donor.donor_number,
            blood_type = %donor.blood_type,
            "[bb-01] Donor registered"
        );
        Ok(donor)
    }

    fn get_donor(&self, id: &DonorId) -> Result<Donor, DonorError> {
        self.repository
            .get(id)?
            .ok_or_else(|| DonorError::DonorNotFound(id.clone()))
    }

    fn list_donors(&self, filter: &DonorFilter) -> Result<Vec<Donor>, DonorError> {
        let mut donors: Vec<Donor> = self
            .repository
            .list()?
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        donors.sort_by(|a, b| a.donor_number.cmp(&b.donor_number));
        Ok(donors)
    }

    fn eligibility(&self, id: &DonorId) -> Result<Eligibility, DonorError> {
        Ok(self.get_donor(id)?.eligibility(self.time_source.now()))
    }

    fn record_donation(
        &self,
        id: &DonorId,
        blood_type: BloodType,
        at: Timestamp,
    ) -> Result<Donor, DonorError> {
        let donor = self
            .repository
            .update(id, &mut |donor| {
                if donor.blood_type != blood_type {
                    return Err(DonorError::field(
                        "bloodType",
                        format!("donor {} is {}, unit is {}", donor.donor_number, donor.blood_type, blood_type),
                    ));
                }
                let eligibility = donor.eligibility(at);
                if !eligibility.eligible {
                    return Err(DonorError::NotEligible {
                        id: donor.id.clone(),
                        reason: eligibility.reason.unwrap_or_default(),
                        next_eligible_date: eligibility.next_eligible_date,
                    });
                }
                donor.record_donation(at);
                Ok(())
            })
            .inspect_err(|e| tracing::warn!("[bb-01] Donation for {} refused: {}", id, e))?
            .ok_or_else(|| DonorError::DonorNotFound(id.clone()))?;

        tracing::info!(
            donor_id = %id,
            donation_count = donor.donation_count,
            "[bb-01] Donation recorded"
        );
        Ok(donor)
    }
}
