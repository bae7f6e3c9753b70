use crate::api::ApiError;
use crate::AppState;
use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Middleware enforcing `Authorization: Bearer <key>` when an API key is
/// configured. Without a key the wrapped routes are open.
pub async fn api_key_middleware(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let expected = req
        .extensions()
        .get::<Arc<AppState>>()
        .and_then(|state| state.api_key.clone());

    if let Some(expected) = expected {
        let presented = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim);

        if presented != Some(expected.as_str()) {
            tracing::warn!(
                path = %req.uri().path(),
                "rejected request with missing or invalid API key"
            );
            return Err(ApiError::Unauthorized);
        }
    }

    Ok(next.run(req).await)
}
