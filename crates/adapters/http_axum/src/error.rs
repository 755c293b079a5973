//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lumen_domain::error::LumenError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
}

/// Maps [`LumenError`] to a `400 Bad Request` response.
///
/// Every rejection is reported the same way; failures that are not the
/// caller's fault are logged as well.
#[derive(Debug)]
pub struct ApiError(LumenError);

impl From<LumenError> for ApiError {
    fn from(err: LumenError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.describe();
        if matches!(self.0, LumenError::Transport(_) | LumenError::Unavailable) {
            tracing::error!(error = %message, "request could not be processed");
        }
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                ok: false,
                error: message,
            }),
        )
            .into_response()
    }
}
