//! Authentication middleware.
//!
//! Resolves the caller's token (`Authorization: Bearer <token>` or the
//! session cookie) to a [`Principal`] and stores it in the request
//! extensions. Handlers check permissions; this layer only decides whether
//! the caller is anyone at all.

use crate::domain::{ApiError, Principal};
use crate::ports::UserDirectory;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tower::{Layer, Service};
use tracing::{debug, warn};

/// Paths served without credentials.
pub const PUBLIC_PATHS: [&str; 2] = ["/health", "/metrics"];

/// Authentication layer
#[derive(Clone)]
pub struct AuthLayer {
    users: Arc<dyn UserDirectory>,
    session_cookie: Arc<str>,
}

impl AuthLayer {
    pub fn new(users: Arc<dyn UserDirectory>, session_cookie: impl Into<Arc<str>>) -> Self {
        Self {
            users,
            session_cookie: session_cookie.into(),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            users: Arc::clone(&self.users),
            session_cookie: Arc::clone(&self.session_cookie),
        }
    }
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    users: Arc<dyn UserDirectory>,
    session_cookie: Arc<str>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let users = Arc::clone(&self.users);
        let session_cookie = Arc::clone(&self.session_cookie);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if is_public(&req) {
                return inner.call(req).await;
            }

            let Some(token) = extract_token(&req, &session_cookie) else {
                debug!(path = %req.uri().path(), "Request without credentials");
                return Ok(ApiError::unauthorized("missing credentials").into_response());
            };

            match users.resolve(&token) {
                Some(principal) => {
                    debug!(user_id = %principal.user_id, role = %principal.role, "Authenticated");
                    req.extensions_mut().insert::<Principal>(principal);
                    inner.call(req).await
                }
                None => {
                    warn!(path = %req.uri().path(), "Rejected unknown or revoked token");
                    Ok(ApiError::unauthorized("invalid or revoked token").into_response())
                }
            }
        })
    }
}

fn is_public<B>(req: &Request<B>) -> bool {
    req.method() == Method::OPTIONS || PUBLIC_PATHS.contains(&req.uri().path())
}

/// Bearer token first, then the session cookie.
fn extract_token<B>(req: &Request<B>, session_cookie: &str) -> Option<String> {
    if let Some(auth) = req.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    req.headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == session_cookie)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
