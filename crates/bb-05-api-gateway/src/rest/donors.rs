//! Donor records.

use super::params::Params;
use super::{JsonBody, ListResponse, PathParam, QueryParams};
use crate::domain::{ApiResult, Permission, Principal};
use crate::router::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bb_01_donor_registry::{Donor, DonorFilter, Eligibility, RegistrationRequest};
use serde::{Deserialize, Serialize};
use shared_types::DonorId;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonorListQuery {
    pub blood_type: Option<String>,
    pub active: Option<String>,
    pub search: Option<String>,
}

pub async fn list_donors(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(query): QueryParams<DonorListQuery>,
) -> ApiResult<Json<ListResponse<Donor>>> {
    principal.require(Permission::DonorsRead)?;

    let mut params = Params::new();
    let filter = DonorFilter {
        blood_type: params.blood_type("bloodType", query.blood_type.as_deref()),
        active: params.boolean("active", query.active.as_deref()),
        search: query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };
    params.finish()?;

    let donors = state.donors.list_donors(&filter)?;
    Ok(Json(ListResponse::truncate(donors, state.limits.max_list_results)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationBody {
    pub first_name: String,
    pub last_name: String,
    pub blood_type: String,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub async fn register_donor(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<RegistrationBody>,
) -> ApiResult<(StatusCode, Json<Donor>)> {
    principal.require(Permission::DonorsWrite)?;

    let mut params = Params::new();
    let date_of_birth = params.date("dateOfBirth", body.date_of_birth.as_deref());
    params.finish()?;

    let donor = state.donors.register(RegistrationRequest {
        first_name: body.first_name,
        last_name: body.last_name,
        blood_type: body.blood_type,
        date_of_birth,
        phone: body.phone,
        email: body.email,
    })?;
    tracing::info!(
        donor_id = %donor.id,
        registered_by = %principal.user_id,
        "[bb-05] Donor registered via API"
    );
    Ok((StatusCode::CREATED, Json(donor)))
}

/// A donor with its eligibility as of now.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorDetail {
    #[serde(flatten)]
    pub donor: Donor,
    pub eligibility: Eligibility,
}

pub async fn get_donor(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<String>,
) -> ApiResult<Json<DonorDetail>> {
    principal.require(Permission::DonorsRead)?;
    let id = DonorId::from(id);
    let donor = state.donors.get_donor(&id)?;
    let eligibility = state.donors.eligibility(&id)?;
    Ok(Json(DonorDetail { donor, eligibility }))
}
