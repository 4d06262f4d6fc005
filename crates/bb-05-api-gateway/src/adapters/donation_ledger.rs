//! Links intake to the donor registry.
//!
//! The lifecycle service only knows the [`DonationLedger`] port; this adapter
//! forwards to the registry and translates its refusals into lifecycle terms.

use bb_01_donor_registry::{DonorError, DonorRegistryApi};
use bb_02_unit_lifecycle::{DonationLedger, LifecycleError};
use shared_types::{BloodType, DonorId, Timestamp};
use std::sync::Arc;

pub struct RegistryDonationLedger {
    registry: Arc<dyn DonorRegistryApi>,
}

impl RegistryDonationLedger {
    pub fn new(registry: Arc<dyn DonorRegistryApi>) -> Self {
        Self { registry }
    }
}

impl DonationLedger for RegistryDonationLedger {
    fn record_donation(
        &self,
        donor_id: &DonorId,
        blood_type: BloodType,
        at: Timestamp,
    ) -> Result<(), LifecycleError> {
        self.registry
            .record_donation(donor_id, blood_type, at)
            .map(|_| ())
            .map_err(|e| match e {
                DonorError::DonorNotFound(id) => {
                    LifecycleError::field("donorId", format!("unknown donor {}", id))
                }
                DonorError::Validation(fields) => {
                    // The registry reports the mismatch on its own bloodType field.
                    LifecycleError::Validation(fields)
                }
                DonorError::NotEligible {
                    id,
                    reason,
                    next_eligible_date,
                } => LifecycleError::Conflict(match next_eligible_date {
                    Some(date) => format!(
                        "donor {} is not eligible: {} (next eligible {})",
                        id,
                        reason,
                        date.format("%Y-%m-%d")
                    ),
                    None => format!("donor {} is not eligible: {}", id, reason),
                }),
                DonorError::Store(e) => LifecycleError::Store(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_01_donor_registry::{
        AtomicSequence, DonorRegistryDependencies, DonorRegistryService, InMemoryDonorRepository,
        RegistrationRequest,
    };
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use shared_types::{FixedTimeSource, TimeSource};

    fn registry() -> (Arc<dyn DonorRegistryApi>, Arc<FixedTimeSource>) {
        let clock = Arc::new(FixedTimeSource::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        ));
        let service = DonorRegistryService::new(DonorRegistryDependencies {
            repository: InMemoryDonorRepository::new(),
            sequence: AtomicSequence::new(),
            time_source: Arc::clone(&clock),
        });
        let registry: Arc<dyn DonorRegistryApi> = Arc::new(service);
        (registry, clock)
    }

    fn register(registry: &Arc<dyn DonorRegistryApi>) -> DonorId {
        registry
            .register(RegistrationRequest {
                first_name: "Abena".into(),
                last_name: "Owusu".into(),
                blood_type: "O-".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 6, 1),
                phone: Some("0244 123 456".into()),
                email: None,
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_unknown_donor_is_validation_error() {
        let (registry, clock) = registry();
        let ledger = RegistryDonationLedger::new(registry);
        match ledger.record_donation(&DonorId::from("DN-x"), BloodType::ONegative, clock.now()) {
            Err(LifecycleError::Validation(fields)) => assert!(fields.contains("donorId")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_second_donation_within_interval_conflicts() {
        let (registry, clock) = registry();
        let id = register(&registry);
        let ledger = RegistryDonationLedger::new(Arc::clone(&registry));

        ledger.record_donation(&id, BloodType::ONegative, clock.now()).unwrap();
        clock.advance(Duration::days(10));
        match ledger.record_donation(&id, BloodType::ONegative, clock.now()) {
            Err(LifecycleError::Conflict(msg)) => assert!(msg.contains("next eligible")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_blood_type_mismatch_is_validation_error() {
        let (registry, clock) = registry();
        let id = register(&registry);
        let ledger = RegistryDonationLedger::new(registry);
        assert!(matches!(
            ledger.record_donation(&id, BloodType::APositive, clock.now()),
            Err(LifecycleError::Validation(_))
        ));
    }
}
