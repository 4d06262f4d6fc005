//! User administration.

use super::{JsonBody, PathParam};
use crate::domain::{ApiError, ApiResult, IssuedUser, NewUserRequest, Permission, Principal, User};
use crate::router::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use shared_types::UserId;

pub async fn list_users(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Json<Vec<User>>> {
    principal.require(Permission::UsersManage)?;
    Ok(Json(state.users.list()))
}

/// The issued token is returned once and never shown again.
pub async fn create_user(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<NewUserRequest>,
) -> ApiResult<(StatusCode, Json<IssuedUser>)> {
    principal.require(Permission::UsersManage)?;
    let (name, role) = body.validate()?;
    let issued = state.users.create(&name, role)?;
    Ok((StatusCode::CREATED, Json(issued)))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    principal: Principal,
    PathParam(id): PathParam<String>,
) -> ApiResult<Json<User>> {
    principal.require(Permission::UsersManage)?;
    let id = UserId::from(id);
    if id == principal.user_id {
        return Err(ApiError::conflict("cannot deactivate the calling user"));
    }
    Ok(Json(state.users.deactivate(&id)?))
}
