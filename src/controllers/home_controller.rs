use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let active = state.engine.active_alerts().len();

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "consent": state.engine.consent_granted(),
            "active_alerts": active,
        })),
    )
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}
