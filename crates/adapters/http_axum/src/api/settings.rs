//! Settings handlers: read the snapshot, apply patches at any depth.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use serde_json::{Map, Value};

use lumen_app::processor::Request;
use lumen_domain::error::LumenError;
use lumen_domain::snapshot::Snapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /settings`
pub async fn get(State(state): State<AppState>) -> Result<Json<Snapshot>, ApiError> {
    let snapshot = state.processor.submit(Request::Snapshot).await?;
    Ok(Json(snapshot))
}

/// `POST /settings` with `region → zone → attributes`.
pub async fn update(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Snapshot>, ApiError> {
    let patch = super::parse_body(&body)?;
    apply(&state, patch).await
}

/// `POST /settings/{region}` with `zone → attributes`.
pub async fn update_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
    body: Bytes,
) -> Result<Json<Snapshot>, ApiError> {
    let zones = super::parse_body(&body)?;
    apply(&state, nest(region, zones)).await
}

/// `POST /settings/{region}/{zone}` with `attributes`.
pub async fn update_zone(
    State(state): State<AppState>,
    Path((region, zone)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Snapshot>, ApiError> {
    let attributes = super::parse_body(&body)?;
    apply(&state, nest(region, nest(zone, attributes))).await
}

fn nest(key: String, value: Value) -> Value {
    Value::Object(Map::from_iter([(key, value)]))
}

async fn apply(state: &AppState, patch: Value) -> Result<Json<Snapshot>, ApiError> {
    let request = match Request::from_json(patch.clone())? {
        request @ Request::Apply(_) => request,
        _ => return Err(LumenError::UnknownRequest(patch.to_string()).into()),
    };
    let snapshot = super::submit(state, request).await?;
    Ok(Json(snapshot))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::router::build;
    use crate::tests::recording_state;

    async fn post(uri: &str, body: &str) -> (StatusCode, Value) {
        let (state, _) = recording_state();
        let response = build(state)
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn should_return_snapshot_of_every_configured_zone() {
        let (state, _) = recording_state();

        let response = build(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            json!({
                "porch": {
                    "1": {"power": null, "color": null, "brightness": null, "name": "Door"}
                }
            })
        );
    }

    #[tokio::test]
    async fn should_apply_zone_settings() {
        let (status, json) = post(
            "/settings/porch/1",
            r#"{"power": true, "color": "Lime", "brightness": 12}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["porch"]["1"],
            json!({"power": true, "color": "#00ff00", "brightness": 12, "name": "Door"})
        );
    }

    #[tokio::test]
    async fn should_apply_region_settings() {
        let (status, json) = post("/settings/porch", r#"{"1": {"power": false}}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["porch"]["1"]["power"], false);
    }

    #[tokio::test]
    async fn should_reject_unknown_region() {
        let (status, json) = post("/settings", r#"{"attic": {"1": {"power": true}}}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"], "not found: Region \"attic\" not found");
    }

    #[tokio::test]
    async fn should_reject_unconfigured_zone() {
        let (status, _) = post("/settings/porch/2", r#"{"power": true}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_reject_unknown_attribute() {
        let (status, _) = post("/settings/porch/1", r#"{"hue": 120}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn should_reject_invalid_brightness() {
        let (status, json) = post("/settings/porch/1", r#"{"brightness": 99}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"],
            "invalid argument: brightness must be an integer between 2 and 27, got 99"
        );
    }

    #[tokio::test]
    async fn should_reject_array_body_on_settings() {
        let (status, json) = post("/settings", r#"[["reset"]]"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "unknown request: [[\"reset\"]]");
    }

    #[tokio::test]
    async fn should_reject_malformed_json() {
        let (status, json) = post("/settings", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["ok"], false);
    }
}
