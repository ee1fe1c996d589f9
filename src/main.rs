use std::sync::Arc;

use price_alerts::{
    config,
    logging,
    routes,
    services::{
        alert_monitor::spawn_price_alert_monitor,
        notifications::{BroadcastNotifier, TracingAnalytics},
        price_fetcher::WikiPricesClient,
        storage::FileStorage,
    },
    AlertEngine, AppState,
};

#[tokio::main]
async fn main() -> price_alerts::Result<()> {
    logging::init_tracing();

    let settings = config::load();

    let fetcher = WikiPricesClient::new(
        &settings.prices_api_base,
        &settings.prices_user_agent,
        settings.http_timeout,
    )?;
    let storage = FileStorage::open(&settings.storage_path);
    tracing::info!("alert storage at {}", storage.path().display());

    let (events_tx, _events_rx) = tokio::sync::broadcast::channel(64);
    let notifier = BroadcastNotifier::new(events_tx.clone());

    let engine = AlertEngine::builder(Arc::new(fetcher), Arc::new(storage), Arc::new(notifier))
        .analytics(Arc::new(TracingAnalytics))
        .consent(settings.storage_consent)
        .build();

    let monitor = spawn_price_alert_monitor(engine.clone(), settings.check_interval);

    let addr = settings.socket_addr()?;
    let state = AppState {
        engine,
        settings,
        events_tx,
    };
    let app = routes::app(state);

    tracing::info!("listening on http://{}", addr);
    let listener = routes::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    monitor.abort();
    Ok(())
}
