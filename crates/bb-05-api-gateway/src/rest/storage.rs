//! Cold-storage units and their readings.

use super::params::Params;
use super::{JsonBody, ListResponse, PathParam, QueryParams};
use crate::domain::{ApiResult, Permission, Principal};
use crate::router::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bb_03_cold_storage::{
    ReadingOutcome, StorageAlert, StorageFilter, StorageKind, StorageRegistration, StorageUnit,
};
use serde::Deserialize;
use shared_types::StorageUnitId;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageListQuery {
    pub facility: Option<String>,
    pub kind: Option<String>,
}

pub async fn list_storage_units(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(query): QueryParams<StorageListQuery>,
) -> ApiResult<Json<ListResponse<StorageUnit>>> {
    principal.require(Permission::StorageRead)?;

    let mut params = Params::new();
    let filter = StorageFilter {
        facility: query
            .facility
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty()),
        kind: params.parsed::<StorageKind>("kind", query.kind.as_deref()),
    };
    params.finish()?;

    let units = state.storage.list_storage_units(&filter)?;
    Ok(Json(ListResponse::truncate(units, state.limits.max_list_results)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageBody {
    pub name: String,
    pub facility: String,
    pub kind: String,
    pub capacity_units: i64,
}

pub async fn register_storage_unit(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<StorageBody>,
) -> ApiResult<(StatusCode, Json<StorageUnit>)> {
    principal.require(Permission::StorageWrite)?;
    let unit = state.storage.register(StorageRegistration {
        name: body.name,
        facility: body.facility,
        kind: body.kind,
        capacity_units: body.capacity_units,
    })?;
    Ok((StatusCode::CREATED, Json(unit)))
}

pub async fn get_storage_unit(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<String>,
) -> ApiResult<Json<StorageUnit>> {
    principal.require(Permission::StorageRead)?;
    Ok(Json(state.storage.get_storage_unit(&StorageUnitId::from(id))?))
}

#[derive(Debug, Deserialize)]
pub struct ReadingBody {
    pub celsius: f64,
}

pub async fn record_reading(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<String>,
    JsonBody(body): JsonBody<ReadingBody>,
) -> ApiResult<Json<ReadingOutcome>> {
    principal.require(Permission::StorageWrite)?;
    let outcome = state.storage.record_reading(
        &StorageUnitId::from(id),
        body.celsius,
        &principal.actor(),
    )?;
    Ok(Json(outcome))
}

pub async fn alerts(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<StorageAlert>>> {
    principal.require(Permission::StorageRead)?;
    Ok(Json(state.storage.active_alerts()?))
}
