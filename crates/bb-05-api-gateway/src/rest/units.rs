//! Blood unit intake, listing and status writes.

use super::params::{DateBound, Params};
use super::{JsonBody, ListResponse, PathParam, QueryParams};
use crate::domain::{ApiError, ApiResult, Permission, Principal};
use crate::router::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bb_02_unit_lifecycle::{
    BatchStatusOutcome, BloodUnit, IntakeRequest, TemperatureOutcome, TransfusionInput,
    UnitFilter, UnitStatus,
};
use serde::{Deserialize, Serialize};
use shared_types::{DonorId, LocationInput, UnitId};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonationBody {
    pub blood_type: String,
    pub quantity_ml: i64,
    pub collection_date: Option<String>,
    pub donor_id: Option<String>,
    pub location: Option<LocationInput>,
    pub notes: Option<String>,
}

pub async fn create_donation(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<DonationBody>,
) -> ApiResult<(StatusCode, Json<BloodUnit>)> {
    principal.require(Permission::InventoryWrite)?;

    let mut params = Params::new();
    let collection_date =
        params.timestamp("collectionDate", body.collection_date.as_deref(), DateBound::Start);
    params.finish()?;

    let request = IntakeRequest {
        blood_type: body.blood_type,
        quantity_ml: body.quantity_ml,
        collection_date,
        donor_id: body
            .donor_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(DonorId::from),
        location: body.location,
        notes: body.notes,
    };
    let unit = state.units.intake(request, &principal.actor())?;
    Ok((StatusCode::CREATED, Json(unit)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitListQuery {
    pub blood_type: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub facility: Option<String>,
}

pub async fn list_units(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(query): QueryParams<UnitListQuery>,
) -> ApiResult<Json<ListResponse<BloodUnit>>> {
    principal.require(Permission::InventoryRead)?;

    let mut params = Params::new();
    let filter = UnitFilter {
        blood_type: params.blood_type("bloodType", query.blood_type.as_deref()),
        status: params.parsed::<UnitStatus>("status", query.status.as_deref()),
        from: params.timestamp("from", query.from.as_deref(), DateBound::Start),
        to: params.timestamp("to", query.to.as_deref(), DateBound::End),
        facility: query
            .facility
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty()),
    };
    if let (Some(from), Some(to)) = (filter.from, filter.to) {
        if from > to {
            params.error("from", "must not be after 'to'");
        }
    }
    params.finish()?;

    let units = state.units.list_units(&filter)?;
    Ok(Json(ListResponse::truncate(units, state.limits.max_list_results)))
}

pub async fn get_unit(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<String>,
) -> ApiResult<Json<BloodUnit>> {
    principal.require(Permission::InventoryRead)?;
    Ok(Json(state.units.get_unit(&UnitId::from(id))?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusBody {
    pub status: String,
    pub notes: Option<String>,
}

pub async fn update_status(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<String>,
    JsonBody(body): JsonBody<StatusBody>,
) -> ApiResult<Json<BloodUnit>> {
    principal.require(Permission::InventoryWrite)?;
    let unit = state.units.update_status(
        &UnitId::from(id),
        &body.status,
        body.notes,
        &principal.actor(),
    )?;
    Ok(Json(unit))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchStatusBody {
    pub unit_ids: Vec<String>,
    pub status: String,
    pub notes: Option<String>,
}

/// Batch outcome with its counts spelled out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusResponse {
    #[serde(flatten)]
    pub outcome: BatchStatusOutcome,
    pub updated_count: usize,
    pub not_found_count: usize,
    pub rejected_count: usize,
    pub failed_count: usize,
}

impl From<BatchStatusOutcome> for BatchStatusResponse {
    fn from(outcome: BatchStatusOutcome) -> Self {
        Self {
            updated_count: outcome.updated_count(),
            not_found_count: outcome.not_found_count(),
            rejected_count: outcome.rejected_count(),
            failed_count: outcome.failed_count(),
            outcome,
        }
    }
}

pub async fn batch_update_status(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<BatchStatusBody>,
) -> ApiResult<Json<BatchStatusResponse>> {
    principal.require(Permission::InventoryWrite)?;

    let max = state.limits.max_batch_size;
    if body.unit_ids.len() > max {
        return Err(ApiError::invalid_field(
            "unitIds",
            format!("at most {} identifiers per batch", max),
        ));
    }

    let ids: Vec<UnitId> = body.unit_ids.into_iter().map(UnitId::from).collect();
    let outcome = state
        .units
        .batch_update_status(&ids, &body.status, body.notes, &principal.actor())?;
    Ok(Json(outcome.into()))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransfusionBody {
    pub recipient_ref: String,
    pub hospital: String,
    pub physician: String,
    pub transfused_at: Option<String>,
}

pub async fn record_transfusion(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<String>,
    JsonBody(body): JsonBody<TransfusionBody>,
) -> ApiResult<Json<BloodUnit>> {
    principal.require(Permission::InventoryWrite)?;

    let mut params = Params::new();
    let transfused_at =
        params.timestamp("transfusedAt", body.transfused_at.as_deref(), DateBound::Start);
    params.finish()?;

    let input = TransfusionInput {
        recipient_ref: body.recipient_ref,
        hospital: body.hospital,
        physician: body.physician,
        transfused_at,
    };
    let unit = state
        .units
        .record_transfusion(&UnitId::from(id), input, &principal.actor())?;
    Ok(Json(unit))
}

#[derive(Debug, Deserialize)]
pub struct ReadingBody {
    pub celsius: f64,
}

pub async fn record_temperature(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<String>,
    JsonBody(body): JsonBody<ReadingBody>,
) -> ApiResult<Json<TemperatureOutcome>> {
    principal.require(Permission::InventoryWrite)?;
    let outcome = state
        .units
        .record_temperature(&UnitId::from(id), body.celsius, &principal.actor())?;
    Ok(Json(outcome))
}
