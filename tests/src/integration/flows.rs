//! # Integration Test Flows
//!
//! Subsystems wired exactly as the runtime wires them, driven through their
//! API traits.
//!
//! ## Flows Tested:
//!
//! 1. **Donor Registry (01) → Unit Lifecycle (02)**: intake linked to a donor
//!    records the donation and blocks a second one inside the interval
//! 2. **Unit Lifecycle (02) → Reporting (04)**: expiry tiers, wastage and
//!    shortages follow unit status writes; closed units stay out of stock
//! 3. **Cold Storage (03)**: excursions raise and clear alerts

use super::fixtures::{t0, technician, TestBank};
use bb_01_donor_registry::{DonorError, RegistrationRequest};
use bb_02_unit_lifecycle::{
    IntakeRequest, LifecycleError, TransfusionInput, UnitFilter, UnitStatus,
};
use bb_03_cold_storage::StorageRegistration;
use bb_04_reporting::{ReportFilter, ShortageLevel};
use chrono::{Duration, NaiveDate};
use shared_types::{BloodType, DonorId, UnitId};
use std::sync::Arc;

// =============================================================================
// TEST FIXTURES
// =============================================================================

fn register_donor(bank: &TestBank, blood_type: &str) -> DonorId {
    bank.container
        .donors
        .register(RegistrationRequest {
            first_name: "Kofi".into(),
            last_name: "Mensah".into(),
            blood_type: blood_type.into(),
            date_of_birth: NaiveDate::from_ymd_opt(1988, 2, 14),
            phone: Some("+233 20 555 0142".into()),
            email: None,
        })
        .unwrap()
        .id
}

fn intake_from(bank: &TestBank, donor: &DonorId, blood_type: &str) -> Result<UnitId, LifecycleError> {
    bank.units()
        .intake(
            IntakeRequest {
                blood_type: blood_type.into(),
                quantity_ml: 470,
                collection_date: None,
                donor_id: Some(donor.clone()),
                location: None,
                notes: Some("walk-in".into()),
            },
            &technician(),
        )
        .map(|unit| unit.id().clone())
}

// =============================================================================
// DONOR REGISTRY → UNIT LIFECYCLE
// =============================================================================

#[test]
fn test_donor_donation_to_transfusion() {
    let bank = TestBank::new();
    let donor = register_donor(&bank, "A-");
    let id = intake_from(&bank, &donor, "A-").unwrap();

    let recorded = bank.container.donors.get_donor(&donor).unwrap();
    assert_eq!(recorded.last_donation, Some(t0()));
    assert!(!bank.container.donors.eligibility(&donor).unwrap().eligible);

    bank.set_status(&id, "Available");
    bank.clock.advance(Duration::hours(6));
    let unit = bank
        .units()
        .record_transfusion(
            &id,
            TransfusionInput {
                recipient_ref: "MRN-20931".into(),
                hospital: "Korle Bu".into(),
                physician: "Dr. Asante".into(),
                transfused_at: None,
            },
            &technician(),
        )
        .unwrap();

    assert_eq!(unit.status(), UnitStatus::Transfused);
    let statuses: Vec<UnitStatus> = unit.history().iter().map(|h| h.status).collect();
    assert_eq!(
        statuses,
        vec![UnitStatus::Quarantined, UnitStatus::Available, UnitStatus::Transfused]
    );

    let dashboard = bank.container.reports.dashboard().unwrap();
    assert_eq!(dashboard.transfusions_last_30_days, 1);
    assert_eq!(dashboard.available_units, 0);
}

#[test]
fn test_second_donation_inside_interval_is_refused() {
    let bank = TestBank::new();
    let donor = register_donor(&bank, "O+");
    intake_from(&bank, &donor, "O+").unwrap();

    bank.clock.advance(Duration::days(30));
    let err = intake_from(&bank, &donor, "O+").unwrap_err();
    assert!(matches!(err, LifecycleError::Conflict(_)), "{err}");
    assert_eq!(bank.units().all_units().unwrap().len(), 1);

    bank.clock.advance(Duration::days(27));
    assert!(intake_from(&bank, &donor, "O+").is_ok());
}

#[test]
fn test_unit_blood_type_must_match_donor() {
    let bank = TestBank::new();
    let donor = register_donor(&bank, "B+");
    let err = intake_from(&bank, &donor, "AB+").unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(_)));

    // Nothing was recorded against the donor.
    assert!(bank.container.donors.eligibility(&donor).unwrap().eligible);
}

#[test]
fn test_unknown_donor_is_rejected() {
    let bank = TestBank::new();
    let err = intake_from(&bank, &DonorId::from("DN-missing"), "B+").unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(fields) if fields.contains("donorId")));
    assert!(matches!(
        bank.container.donors.get_donor(&DonorId::from("DN-missing")),
        Err(DonorError::DonorNotFound(_))
    ));
}

// =============================================================================
// UNIT LIFECYCLE → REPORTING
// =============================================================================

#[test]
fn test_expiry_tiers_move_with_the_clock() {
    let bank = TestBank::new();
    // 42-day shelf life: expires in 2, 5, 10 and 22 days.
    bank.collect_available("O-", 40);
    bank.collect_available("O-", 37);
    bank.collect_available("A+", 32);
    bank.collect_available("A+", 20);

    let report = bank.container.reports.expiry_tracking(None).unwrap();
    assert_eq!(report.counts.expired, 0);
    assert_eq!(report.counts.critical, 1);
    assert_eq!(report.counts.warning, 1);
    assert_eq!(report.counts.caution, 1);
    assert_eq!(report.buckets.untracked, 1);

    bank.clock.advance(Duration::days(3));
    let report = bank.container.reports.expiry_tracking(None).unwrap();
    assert_eq!(report.counts.expired, 1);
    assert_eq!(report.counts.critical, 1);
    assert_eq!(report.counts.warning, 1);
    assert_eq!(report.counts.caution, 0);

    let o_neg = bank
        .container
        .reports
        .expiry_tracking(Some(BloodType::ONegative))
        .unwrap();
    assert_eq!(o_neg.counts.expired + o_neg.counts.critical, 2);
    assert_eq!(o_neg.counts.warning, 0);
}

#[test]
fn test_marking_expired_forces_expiration_date() {
    let bank = TestBank::new();
    let fresh = bank.collect_available("AB-", 1);
    let unit = bank.set_status(&fresh, "Expired");
    assert_eq!(unit.expiration_date(), t0());
    let last = unit.history().last().unwrap();
    assert!(last.expiration_overridden_from.is_some());

    let stale = bank.collect_available("AB-", 41);
    let shelf_expiry = bank.units().get_unit(&stale).unwrap().expiration_date();
    bank.clock.advance(Duration::days(2));
    let unit = bank.set_status(&stale, "Expired");
    assert_eq!(unit.expiration_date(), shelf_expiry);
    assert!(unit.history().last().unwrap().expiration_overridden_from.is_none());
}

#[test]
fn test_wastage_rate_for_period() {
    let bank = TestBank::new();
    let ids: Vec<UnitId> = (0..100).map(|_| bank.collect("B-", 0).id().clone()).collect();
    for id in &ids[..10] {
        bank.set_status(id, "Expired");
    }
    for id in &ids[10..15] {
        bank.set_status(id, "Discarded");
    }

    let report = bank.container.reports.wastage(&ReportFilter::default()).unwrap();
    assert_eq!(report.processed, 100);
    assert_eq!(report.expired, 10);
    assert_eq!(report.discarded, 5);
    assert_eq!(report.wastage_rate, 15.0);
}

#[test]
fn test_batch_reports_missing_identifiers() {
    let bank = TestBank::new();
    let mut ids: Vec<UnitId> = (0..6).map(|_| bank.collect("A-", 2).id().clone()).collect();
    ids.push(UnitId::from("BU-gone-1"));
    ids.push(UnitId::from("BU-gone-2"));

    let outcome = bank
        .units()
        .batch_update_status(&ids, "Reserved", Some("theatre 3".into()), &technician())
        .unwrap();
    assert_eq!(outcome.updated_count(), 6);
    assert_eq!(outcome.not_found_count(), 2);

    let reserved = bank
        .units()
        .list_units(&UnitFilter {
            status: Some(UnitStatus::Reserved),
            ..UnitFilter::default()
        })
        .unwrap();
    assert_eq!(reserved.len(), 6);
}

#[test]
fn test_invalid_status_leaves_unit_untouched() {
    let bank = TestBank::new();
    let id = bank.collect("O+", 0).id().clone();
    let err = bank
        .units()
        .update_status(&id, "Lost", None, &technician())
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(_)));

    let unit = bank.units().get_unit(&id).unwrap();
    assert_eq!(unit.status(), UnitStatus::Quarantined);
    assert_eq!(unit.history().len(), 1);
}

#[test]
fn test_closed_units_never_return_to_stock() {
    let bank = TestBank::new();
    let expired = bank.collect_available("O-", 5);
    bank.set_status(&expired, "Expired");
    let discarded = bank.collect_available("O-", 5);
    bank.set_status(&discarded, "Discarded");

    for id in [&expired, &discarded] {
        let before = bank.units().get_unit(id).unwrap();
        let err = bank
            .units()
            .update_status(id, "Available", None, &technician())
            .unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidState { .. }), "{err}");
        let after = bank.units().get_unit(id).unwrap();
        assert_eq!(after.history().len(), before.history().len());
        assert_eq!(after.expiration_date(), before.expiration_date());
    }

    let outcome = bank
        .units()
        .batch_update_status(&[expired.clone(), discarded.clone()], "Available", None, &technician())
        .unwrap();
    assert_eq!(outcome.updated_count(), 0);
    assert_eq!(outcome.rejected_count(), 2);

    let dashboard = bank.container.reports.dashboard().unwrap();
    assert_eq!(dashboard.available_units, 0);
    let o_neg = dashboard
        .supply
        .iter()
        .find(|line| line.blood_type == BloodType::ONegative)
        .unwrap();
    assert_eq!(o_neg.available, 0);
}

#[test]
fn test_concurrent_status_writes_append_history() {
    let bank = Arc::new(TestBank::new());
    let ids: Vec<UnitId> = (0..5).map(|_| bank.collect("A+", 1).id().clone()).collect();

    let handles: Vec<_> = ["Available", "Reserved", "Available", "Reserved"]
        .into_iter()
        .map(|status| {
            let bank = Arc::clone(&bank);
            let ids = ids.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    bank.units()
                        .batch_update_status(&ids, status, None, &technician())
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for id in &ids {
        let unit = bank.units().get_unit(id).unwrap();
        // One intake entry plus one per write.
        assert_eq!(unit.history().len(), 41);
        assert!(matches!(unit.status(), UnitStatus::Available | UnitStatus::Reserved));
    }
}

#[test]
fn test_dashboard_shortage_levels() {
    let bank = TestBank::new();
    for _ in 0..12 {
        bank.collect_available("B+", 3);
    }
    let dashboard = bank.container.reports.dashboard().unwrap();

    let b_pos = dashboard
        .supply
        .iter()
        .find(|line| line.blood_type == BloodType::BPositive)
        .unwrap();
    assert_eq!(b_pos.available, 12);
    assert_eq!(b_pos.level, ShortageLevel::Critical);

    assert_eq!(dashboard.critical_shortages.len(), BloodType::ALL.len());
    assert_eq!(dashboard.available_units, 12);
}

// =============================================================================
// COLD STORAGE
// =============================================================================

#[test]
fn test_freezer_excursion_raises_and_clears_alert() {
    let bank = TestBank::new();
    let storage = &bank.container.storage;
    let freezer = storage
        .register(StorageRegistration {
            name: "Plasma Freezer 2".into(),
            facility: "Central".into(),
            kind: "Freezer".into(),
            capacity_units: 400,
        })
        .unwrap();

    let outcome = storage.record_reading(&freezer.id, -12.0, &technician()).unwrap();
    assert!(outcome.excursion);
    let alerts = storage.active_alerts().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].storage_unit_id, freezer.id);

    bank.clock.advance(Duration::minutes(30));
    let outcome = storage.record_reading(&freezer.id, -25.0, &technician()).unwrap();
    assert!(!outcome.excursion);
    assert!(storage.active_alerts().unwrap().is_empty());
}
