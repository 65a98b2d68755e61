// HTTP API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::config::Environment;
use crate::database::StoreError;

/// HTTP API error with appropriate status codes and client-facing bodies.
///
/// Every failure the handlers can produce maps onto exactly one variant, and
/// the variant alone determines the response shape.
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized,

    // 404 Not Found
    NotFound(String),

    // 400 Bad Request
    MissingField(&'static str),
    InvalidRating,
    EmptyPatch,

    // 500 Internal Server Error
    Storage {
        message: String,
        detail: Option<String>,
    },
}

impl ApiError {
    pub fn bookmark_not_found() -> Self {
        ApiError::NotFound("Bookmark doesn't exist".to_string())
    }

    /// Convert a storage failure into the 500 response. The raw detail is
    /// only surfaced outside production.
    pub fn storage(err: StoreError, environment: &Environment) -> Self {
        tracing::error!("storage error: {}", err);
        let detail = if environment.is_production() {
            None
        } else {
            Some(format!("{:?}", err))
        };
        ApiError::Storage {
            message: err.to_string(),
            detail,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingField(_) | ApiError::InvalidRating | ApiError::EmptyPatch => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "Unauthorized access"),
            ApiError::NotFound(msg) => write!(f, "{}", msg),
            ApiError::MissingField(field) => {
                write!(f, "Missing '{}' in the request body", field)
            }
            ApiError::InvalidRating => write!(f, "Invalid data"),
            ApiError::EmptyPatch => {
                write!(f, "Request body must contain either 'title', 'url' or 'rating'")
            }
            ApiError::Storage { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        match self {
            ApiError::Unauthorized => {
                (status, Json(json!({ "error": "Unauthorized access" }))).into_response()
            }
            // Invalid rating keeps the legacy plain-text body
            ApiError::InvalidRating => (status, "Invalid data").into_response(),
            ApiError::Storage { message, detail } => match detail {
                Some(detail) => {
                    (status, Json(json!({ "message": message, "error": detail }))).into_response()
                }
                None => {
                    (status, Json(json!({ "error": { "message": "server error" } }))).into_response()
                }
            },
            other => {
                let body = json!({ "error": { "message": other.to_string() } });
                (status, Json(body)).into_response()
            }
        }
    }
}
