use std::{collections::HashMap, time::Duration};

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::{task::JoinHandle, time};

use crate::{
    engine::AlertEngine,
    models::{Alert, PriceMap, PriceSample},
    services::{
        alert_store::AlertStore,
        evaluator::{evaluate, TriggerDecision},
        notifications::NotificationSink,
        price_fetcher::PriceFetcher,
    },
};

/// Result of one evaluation pass over a snapshot.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CheckOutcome {
    pub checked: usize,
    pub triggered: Vec<Alert>,
    /// Alerts left active because the watched side had no price.
    pub skipped: Vec<String>,
    /// Alerts left active because their price request failed.
    pub failed: Vec<String>,
}

#[derive(Clone, Copy)]
enum Lookup {
    Sample(PriceSample),
    NoData,
    Failed,
}

/// Runs the alert monitor on a fixed period until the task is aborted.
/// While there is nothing to check (no active alerts, or no storage consent)
/// the loop parks until the engine signals new work.
pub fn spawn_price_alert_monitor(engine: AlertEngine, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            if !engine.has_pending_work() {
                tracing::debug!("[alert-monitor] idle, waiting for alerts");
                engine.wait_for_work().await;
                continue;
            }

            interval.tick().await;

            let outcome = engine.check_alerts(None, None).await;
            if outcome.checked > 0 {
                tracing::debug!(
                    checked = outcome.checked,
                    triggered = outcome.triggered.len(),
                    skipped = outcome.skipped.len(),
                    failed = outcome.failed.len(),
                    "[alert-monitor] tick done"
                );
            }
        }
    })
}

/// Evaluates every alert of `snapshot` in order. Prices come from `prices`
/// when it has the item, otherwise from `fetcher` (once per item per pass).
///
/// Failure isolation is per item: a failed request marks every alert on that
/// item as failed for this pass and leaves the other items untouched.
pub(crate) async fn evaluate_snapshot(
    store: &Mutex<AlertStore>,
    fetcher: &dyn PriceFetcher,
    notifier: &dyn NotificationSink,
    snapshot: Vec<Alert>,
    prices: Option<&PriceMap>,
) -> CheckOutcome {
    let mut outcome = CheckOutcome {
        checked: snapshot.len(),
        ..Default::default()
    };
    let mut fetched: HashMap<u32, Lookup> = HashMap::new();

    for alert in snapshot {
        let lookup = match prices.and_then(|p| p.get(&alert.item_id)) {
            Some(sample) => Lookup::Sample(*sample),
            None => match fetched.get(&alert.item_id) {
                Some(cached) => *cached,
                None => {
                    let res = fetch_lookup(fetcher, alert.item_id).await;
                    fetched.insert(alert.item_id, res);
                    res
                }
            },
        };

        let sample = match lookup {
            Lookup::Sample(sample) => sample,
            Lookup::NoData => {
                outcome.skipped.push(alert.id);
                continue;
            }
            Lookup::Failed => {
                outcome.failed.push(alert.id);
                continue;
            }
        };

        match evaluate(&alert, &sample, Utc::now().timestamp_millis()) {
            TriggerDecision::NoTrigger => {}
            TriggerDecision::Skip => outcome.skipped.push(alert.id),
            TriggerDecision::Trigger {
                captured_price,
                captured_at,
            } => {
                // the alert may have been removed or fired while we awaited
                let updated = store
                    .lock()
                    .mark_triggered(&alert.id, captured_price, captured_at);

                if let Some(updated) = updated {
                    notifier.notify(&updated);
                    outcome.triggered.push(updated);
                }
            }
        }
    }

    outcome
}

async fn fetch_lookup(fetcher: &dyn PriceFetcher, item_id: u32) -> Lookup {
    match fetcher.fetch_price(item_id).await {
        Ok(Some(sample)) => Lookup::Sample(sample),
        Ok(None) => Lookup::NoData,
        Err(e) => {
            tracing::warn!(item_id, "[alert-monitor] price fetch failed: {}", e);
            Lookup::Failed
        }
    }
}
