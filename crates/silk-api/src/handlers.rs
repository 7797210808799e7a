//! Control-plane REST handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use silk_core::{ColorParams, Error, GestureResult, LandmarkFrame, ParticleParams};
use silk_effects::ColorRequest;

use crate::messages::ParticleUpdate;
use crate::state::AppState;

/// Error wrapper mapping the pipeline taxonomy onto HTTP responses.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = json!({
            "error": {
                "kind": self.0.kind(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "service": "silkflow",
        "status": "running",
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

/// Analyze one landmark frame and apply it to the default room.
///
/// Empty frames return a client error and leave room state untouched.
pub async fn analyze_gesture(
    State(state): State<AppState>,
    Json(frame): Json<LandmarkFrame>,
) -> Result<Json<GestureResult>, ApiError> {
    let room = state.default_room().await;
    let result = room.analyze(frame).await?;
    Ok(Json(result))
}

/// Apply a direct particle update; out-of-range intensity is clamped,
/// not rejected.
pub async fn update_particle(
    State(state): State<AppState>,
    Json(update): Json<ParticleUpdate>,
) -> Result<Json<ParticleParams>, ApiError> {
    let room = state.default_room().await;
    let params = room.update_particle(update).await?;
    Ok(Json(params))
}

/// Change the room's color state; unknown themes fall back to "cosmic".
pub async fn change_color(
    State(state): State<AppState>,
    Json(request): Json<ColorRequest>,
) -> Result<Json<ColorParams>, ApiError> {
    let room = state.default_room().await;
    let params = room.change_color(request).await?;
    Ok(Json(params))
}
