//! Error responses for the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use family_assist_core::AppError;
use serde::Serialize;

/// Body sent to clients for every failure.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

/// Any failure while handling a request.
///
/// Rendered as `500 {"error": "Server error"}`. The underlying error is
/// logged and never sent to the client.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: SERVER_ERROR_MESSAGE,
            }),
        )
            .into_response()
    }
}
