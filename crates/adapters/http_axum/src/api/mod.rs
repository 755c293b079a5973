//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod sequence;
#[allow(clippy::missing_errors_doc)]
pub mod settings;

use axum::Router;
use axum::body::Bytes;
use axum::routing::{get, post};
use serde_json::Value;

use lumen_app::processor::Request;
use lumen_domain::error::LumenError;
use lumen_domain::snapshot::Snapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the API sub-router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(settings::get).post(settings::update))
        .route("/settings/{region}", post(settings::update_region))
        .route("/settings/{region}/{zone}", post(settings::update_zone))
        .route("/sequence", post(sequence::run))
}

/// Decode a raw request body. The content type is not checked.
fn parse_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|err| LumenError::MalformedPayload(err).into())
}

/// Check a request against the configuration, then run it.
async fn submit(state: &AppState, request: Request) -> Result<Snapshot, ApiError> {
    request.validate(&state.regions)?;
    Ok(state.processor.submit(request).await?)
}
