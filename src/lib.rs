//! Library entrypoint for the price alert engine.
//!
//! The engine is usable on its own (see [`engine::AlertEngine`]); the HTTP
//! surface in `controllers`/`routes` exposes it to the dashboard and lets
//! integration tests under `tests/` drive it through a router.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;

pub mod engine;
pub mod services;

pub mod events;

pub mod controllers;
pub mod routes;

pub use engine::{AlertEngine, AlertEngineBuilder};
pub use error::{AlertError, Result};

#[derive(Clone)]
pub struct AppState {
    pub engine: AlertEngine,
    pub settings: config::Settings,
    pub events_tx: tokio::sync::broadcast::Sender<models::Alert>,
}
