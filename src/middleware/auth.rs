use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{validate_jwt, AuthUser};
use crate::error::ApiError;

/// Validates the bearer token and injects the caller's [`AuthUser`] into
/// request extensions.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers).map_err(|reason| {
        tracing::debug!("Rejected request to {}: {}", request.uri().path(), reason);
        ApiError::unauthorized("User is not authenticated")
    })?;

    let claims = validate_jwt(token).map_err(|e| {
        tracing::warn!("JWT validation failed: {}", e);
        ApiError::unauthorized("Invalid token")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers.get(AUTHORIZATION).ok_or("missing Authorization header")?;
    let value = value.to_str().map_err(|_| "Authorization header is not ASCII")?;
    let token = value.strip_prefix("Bearer ").ok_or("Authorization header is not a Bearer token")?.trim();
    if token.is_empty() {
        return Err("empty bearer token");
    }
    Ok(token)
}
