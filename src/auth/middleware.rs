use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::models::AuthenticatedUser;
use super::token::IdentityVerifier;
use crate::gateway::types::ApiError;

/// Bind the caller's identity to the request.
///
/// - No `Authorization` header: the request continues anonymously.
/// - Valid bearer token: `AuthenticatedUser` is inserted into extensions.
/// - Anything else: 401.
pub async fn identity_middleware(
    State(verifier): State<Arc<IdentityVerifier>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(value) = request.headers().get(header::AUTHORIZATION) else {
        return Ok(next.run(request).await);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Invalid token format"))?;

    match verifier.verify(token) {
        Ok(claims) => {
            request
                .extensions_mut()
                .insert(AuthenticatedUser::from(claims));
            Ok(next.run(request).await)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Bearer token rejected");
            Err(ApiError::unauthorized("Invalid or expired token"))
        }
    }
}
