use serde_json::Value;
use tokio::sync::broadcast;

use crate::models::Alert;

pub const EVENT_REMOVE_ALERT: &str = "remove_price_alert";
pub const EVENT_UPDATE_ALERT: &str = "update_price_alert";

/// Receives every alert right after it transitions to triggered.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, alert: &Alert);
}

/// Fans triggered alerts out to every open dashboard (see `events::sse_events`).
#[derive(Clone)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Alert>,
}

impl BroadcastNotifier {
    pub fn new(tx: broadcast::Sender<Alert>) -> Self {
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Alert> {
        self.tx.subscribe()
    }
}

impl NotificationSink for BroadcastNotifier {
    fn notify(&self, alert: &Alert) {
        tracing::info!(
            alert_id = %alert.id,
            item_id = alert.item_id,
            "price alert triggered for {}",
            alert.item_name
        );

        // no subscribers is fine, nobody is looking
        let _ = self.tx.send(alert.clone());
    }
}

/// Usage analytics for alert edits.
pub trait AnalyticsSink: Send + Sync {
    fn track(&self, event: &str, params: Value);
}

pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: &str, params: Value) {
        tracing::info!(target: "analytics", event, %params);
    }
}
