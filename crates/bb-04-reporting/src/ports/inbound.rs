//! # Inbound Ports (Driving Ports)

use crate::domain::{
    BloodTypeDistribution, DashboardSummary, ExpiryTrackingReport, GroupBy, InventoryReport,
    ReportError, ReportFilter, WastageReport,
};
use shared_types::BloodType;

/// Read-only report API.
pub trait ReportingApi: Send + Sync {
    fn dashboard(&self) -> Result<DashboardSummary, ReportError>;

    /// Expiry tiers of available units, optionally for one blood type.
    fn expiry_tracking(&self, blood_type: Option<BloodType>) -> Result<ExpiryTrackingReport, ReportError>;

    fn distribution(&self, filter: &ReportFilter) -> Result<BloodTypeDistribution, ReportError>;

    fn inventory(&self, group_by: GroupBy, filter: &ReportFilter) -> Result<InventoryReport, ReportError>;

    /// Wastage over the filter period. Without a lower bound the period is
    /// the trailing 30 days.
    fn wastage(&self, filter: &ReportFilter) -> Result<WastageReport, ReportError>;
}
