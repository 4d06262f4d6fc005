//! Read-only reports over the unit inventory.

use super::params::{DateBound, Params};
use super::QueryParams;
use crate::domain::{ApiResult, Permission, Principal};
use crate::router::AppState;
use axum::extract::State;
use axum::Json;
use bb_04_reporting::{
    BloodTypeDistribution, DashboardSummary, ExpiryTrackingReport, GroupBy, InventoryReport,
    ReportFilter, WastageReport,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub blood_type: Option<String>,
    pub group_by: Option<String>,
}

impl ReportQuery {
    fn filter(&self, params: &mut Params) -> ReportFilter {
        ReportFilter {
            from: params.timestamp("from", self.from.as_deref(), DateBound::Start),
            to: params.timestamp("to", self.to.as_deref(), DateBound::End),
            blood_type: params.blood_type("bloodType", self.blood_type.as_deref()),
        }
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<DashboardSummary>> {
    principal.require(Permission::ReportsRead)?;
    Ok(Json(state.reports.dashboard()?))
}

pub async fn expiry(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(query): QueryParams<ReportQuery>,
) -> ApiResult<Json<ExpiryTrackingReport>> {
    principal.require(Permission::ReportsRead)?;
    let mut params = Params::new();
    let blood_type = params.blood_type("bloodType", query.blood_type.as_deref());
    params.finish()?;
    Ok(Json(state.reports.expiry_tracking(blood_type)?))
}

pub async fn distribution(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(query): QueryParams<ReportQuery>,
) -> ApiResult<Json<BloodTypeDistribution>> {
    principal.require(Permission::ReportsRead)?;
    let mut params = Params::new();
    let filter = query.filter(&mut params);
    params.finish()?;
    Ok(Json(state.reports.distribution(&filter)?))
}

pub async fn inventory(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(query): QueryParams<ReportQuery>,
) -> ApiResult<Json<InventoryReport>> {
    principal.require(Permission::ReportsRead)?;
    let mut params = Params::new();
    let filter = query.filter(&mut params);
    let group_by = params
        .parsed::<GroupBy>("groupBy", query.group_by.as_deref())
        .unwrap_or_default();
    params.finish()?;
    Ok(Json(state.reports.inventory(group_by, &filter)?))
}

pub async fn wastage(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(query): QueryParams<ReportQuery>,
) -> ApiResult<Json<WastageReport>> {
    principal.require(Permission::ReportsRead)?;
    let mut params = Params::new();
    let filter = query.filter(&mut params);
    params.finish()?;
    Ok(Json(state.reports.wastage(&filter)?))
}
