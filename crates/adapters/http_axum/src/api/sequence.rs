//! `POST /sequence`: run a script of patches, sleeps and resets.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;

use lumen_app::processor::Request;
use lumen_domain::sequence::Sequence;
use lumen_domain::snapshot::Snapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /sequence`
///
/// Answers once the whole sequence has run, with the state at that point.
pub async fn run(State(state): State<AppState>, body: Bytes) -> Result<Json<Snapshot>, ApiError> {
    let sequence = Sequence::from_value(super::parse_body(&body)?)?;
    let snapshot = super::submit(&state, Request::Sequence(sequence)).await?;
    Ok(Json(snapshot))
}
