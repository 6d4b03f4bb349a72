//! Authentication middleware for the admin API

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;

use crate::{error::ApiError, state::AppState};

/// Require a valid admin bearer token
///
/// A missing or non-bearer `Authorization` header yields
/// [`ApiError::MissingToken`]. A token that fails verification or carries a
/// role other than admin yields [`ApiError::InvalidToken`]. On success the
/// [`crate::jwt::Claims`] are inserted into the request extensions.
pub async fn require_admin(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(authorization) = bearer.ok_or(ApiError::MissingToken)?;

    let claims = state.jwt_service.verify(authorization.token()).map_err(|e| {
        warn!("Rejected admin token for {} {}: {}", req.method(), req.uri(), e);
        e
    })?;

    if !claims.is_admin() {
        warn!("Token for '{}' lacks the admin role", claims.sub);
        return Err(ApiError::InvalidToken);
    }

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
