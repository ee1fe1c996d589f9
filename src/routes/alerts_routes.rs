use axum::{Router, routing::{get, patch, post, put}};
use crate::{AppState, controllers::alerts_controller};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/alerts", get(alerts_controller::get_alerts).post(alerts_controller::post_create_alert))
        .route("/alerts/check", post(alerts_controller::post_check_alerts))
        .route("/alerts/refresh", post(alerts_controller::post_refresh_alerts))
        .route("/alerts/clear", post(alerts_controller::post_clear_alerts))
        .route("/alerts/:id", patch(alerts_controller::patch_alert).delete(alerts_controller::delete_alert))
        .route("/consent", put(alerts_controller::put_consent))
}
