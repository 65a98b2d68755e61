use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use crate::app::AppContext;
use crate::error::ApiError;

/// Bearer-token gate applied to every bookmark route. A mismatch or missing
/// credential answers 401 immediately; the request never reaches a handler.
pub async fn bearer_auth(
    State(ctx): State<AppContext>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match bearer_token(request.headers()) {
        Some(token) if token == ctx.config.security.api_token => Ok(next.run(request).await),
        _ => {
            tracing::error!("Unauthorized access to path {}", request.uri().path());
            Err(ApiError::Unauthorized)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
