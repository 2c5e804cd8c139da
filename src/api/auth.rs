//! Static API-key authentication

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::handlers::AppState;
use crate::error::{ApiError, Result};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Rejects requests whose `X-API-Key` header does not match the configured
/// key. Every request passes when no key is configured.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected) {
            warn!(
                "Rejected {} {}: missing or invalid API key",
                request.method(),
                request.uri().path()
            );
            return Err(ApiError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}
