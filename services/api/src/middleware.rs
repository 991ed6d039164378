//! Middleware for JWT token validation and authentication

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

/// The identity resolved from a verified bearer token
///
/// Attached to request extensions by the guard; handlers trust it and
/// never re-check the credential store. A deleted user's still-unexpired
/// token therefore authenticates, and owner-scoped queries for that
/// identity simply come back empty.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Extract and validate the bearer token from the Authorization header
///
/// Rejects with the 401 envelope and short-circuits before any store is
/// touched.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized("Not authorized, no token provided"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("Not authorized, no token provided"))?;

    let claims = state.jwt_service.verify(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized("Not authorized, token invalid or expired")
    })?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}
