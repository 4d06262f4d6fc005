//! REST handlers, grouped by resource.
//!
//! Every handler resolves the caller with the [`Principal`] extractor, checks
//! one permission, decodes its input and delegates to a subsystem API.

pub mod donors;
pub mod params;
pub mod reports;
pub mod storage;
pub mod system;
pub mod units;
pub mod users;

use crate::domain::{ApiError, ApiResult, Permission, Principal};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use serde::Serialize;

/// JSON body whose decoding failures answer with the gateway error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Query string whose decoding failures answer with the gateway error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// Path parameter whose decoding failures answer with the gateway error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathParam<T>(pub T);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("missing credentials"))
    }
}

impl Principal {
    /// 403 unless the caller's role grants `permission`.
    pub fn require(&self, permission: Permission) -> ApiResult<()> {
        if self.can(permission) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                role = %self.role,
                permission = %permission,
                "[bb-05] Permission denied"
            );
            Err(ApiError::forbidden(permission))
        }
    }
}

/// A list response, cut at the configured maximum.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    /// Matches before truncation
    pub total: usize,
    pub truncated: bool,
}

impl<T> ListResponse<T> {
    pub fn truncate(mut items: Vec<T>, max: usize) -> Self {
        let total = items.len();
        items.truncate(max);
        Self {
            truncated: total > items.len(),
            items,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use axum::http::StatusCode;
    use shared_types::UserId;

    #[test]
    fn test_require_permission() {
        let viewer = Principal {
            user_id: UserId::from("US-1"),
            name: "Viewer".into(),
            role: Role::Viewer,
        };
        assert!(viewer.require(Permission::ReportsRead).is_ok());
        let err = viewer.require(Permission::InventoryWrite).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert!(err.message.contains("inventory:write"));
    }

    #[test]
    fn test_list_truncation() {
        let list = ListResponse::truncate(vec![1, 2, 3, 4], 3);
        assert_eq!(list.items, vec![1, 2, 3]);
        assert_eq!(list.total, 4);
        assert!(list.truncated);

        let list = ListResponse::truncate(vec![1], 3);
        assert!(!list.truncated);
    }
}
