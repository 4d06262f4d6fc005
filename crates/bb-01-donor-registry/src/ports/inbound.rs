//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the donor registry.

use crate::domain::{Donor, DonorError, Eligibility, RegistrationRequest};
use serde::{Deserialize, Serialize};
use shared_types::{BloodType, DonorId, Timestamp};

/// Criteria for listing donors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorFilter {
    pub blood_type: Option<BloodType>,
    pub active: Option<bool>,
    /// Substring of the name or donor number.
    pub search: Option<String>,
}

impl DonorFilter {
    pub fn matches(&self, donor: &Donor) -> bool {
        self.blood_type.map_or(true, |bt| donor.blood_type == bt)
            && self.active.map_or(true, |a| donor.active == a)
            && self
                .search
                .as_deref()
                .map_or(true, |s| donor.matches_search(s))
    }
}

/// Primary API for the donor registry.
pub trait DonorRegistryApi: Send + Sync {
    /// Register a donor and assign the next donor number.
    fn register(&self, request: RegistrationRequest) -> Result<Donor, DonorError>;

    fn get_donor(&self, id: &DonorId) -> Result<Donor, DonorError>;

    /// Donors matching `filter`, ordered by donor number.
    fn list_donors(&self, filter: &DonorFilter) -> Result<Vec<Donor>, DonorError>;

    /// Eligibility to donate now.
    fn eligibility(&self, id: &DonorId) -> Result<Eligibility, DonorError>;

    /// Record a donation of `blood_type` taken at `at`.
    ///
    /// ## Errors
    ///
    /// - `DonorNotFound`: no donor with this identifier
    /// - `Validation`: `blood_type` differs from the donor's blood type
    /// - `NotEligible`: donor inactive or donated within the interval
    fn record_donation(
        &self,
        id: &DonorId,
        blood_type: BloodType,
        at: Timestamp,
    ) -> Result<Donor, DonorError>;
}
