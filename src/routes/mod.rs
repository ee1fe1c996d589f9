use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    controllers::home_controller,
    error::{AlertError, Result},
};

pub mod home_routes;
pub mod alerts_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = alerts_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the HTTP listener. A taken or unusable address is a configuration
/// problem, so it is reported as such.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| AlertError::Config(format!("cannot bind {addr}: {e}")))
}
