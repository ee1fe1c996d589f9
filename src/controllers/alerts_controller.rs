use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::AlertError,
    models::{sorted_for_display, AlertDraft, AlertUpdate, PriceMap},
    AppState,
};

fn error_response(e: AlertError) -> Response {
    let status = match e {
        AlertError::InvalidDraft(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

// GET /alerts
pub async fn get_alerts(State(state): State<AppState>) -> Response {
    let alerts = sorted_for_display(&state.engine.alerts());
    (StatusCode::OK, Json(json!({ "alerts": alerts }))).into_response()
}

// POST /alerts
pub async fn post_create_alert(
    State(state): State<AppState>,
    Json(draft): Json<AlertDraft>,
) -> Response {
    match state.engine.add_alert(draft) {
        Ok(alert) => (StatusCode::CREATED, Json(alert)).into_response(),
        Err(e) => error_response(e),
    }
}

// PATCH /alerts/:id
pub async fn patch_alert(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<AlertUpdate>,
) -> Response {
    match state.engine.update_alert(&id, patch) {
        Ok(updated) => (
            StatusCode::OK,
            Json(json!({ "updated": updated, "alert": state.engine.get(&id) })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

// DELETE /alerts/:id
pub async fn delete_alert(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let removed = state.engine.remove_alert(&id);
    (StatusCode::OK, Json(json!({ "removed": removed }))).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    pub ids: Option<Vec<String>>,
    pub prices: Option<PriceMap>,
}

// POST /alerts/check
pub async fn post_check_alerts(
    State(state): State<AppState>,
    body: Option<Json<CheckRequest>>,
) -> Response {
    let req = body.map(|Json(r)| r).unwrap_or_default();

    let outcome = state
        .engine
        .check_alerts(req.ids.as_deref(), req.prices.as_ref())
        .await;

    (StatusCode::OK, Json(outcome)).into_response()
}

// POST /alerts/refresh
pub async fn post_refresh_alerts(State(state): State<AppState>) -> Response {
    let outcome = state.engine.refresh_now().await;
    (StatusCode::OK, Json(outcome)).into_response()
}

// POST /alerts/clear
pub async fn post_clear_alerts(State(state): State<AppState>) -> Response {
    state.engine.clear_all_alerts_and_storage();
    (StatusCode::OK, Json(json!({ "cleared": true }))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct ConsentForm {
    pub granted: bool,
}

// PUT /consent
pub async fn put_consent(State(state): State<AppState>, Json(form): Json<ConsentForm>) -> Response {
    state.engine.set_consent(form.granted);
    (
        StatusCode::OK,
        Json(json!({ "granted": state.engine.consent_granted() })),
    )
        .into_response()
}
