//! The alert engine: one instance per session, owning the alert store and the
//! collaborators the monitor needs. Cloning is cheap and shares state.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{
    error::Result,
    models::{Alert, AlertDraft, AlertUpdate, PriceMap},
    services::{
        alert_monitor::{self, CheckOutcome},
        alert_store::AlertStore,
        notifications::{AnalyticsSink, NotificationSink},
        price_fetcher::PriceFetcher,
        storage::PersistentStore,
    },
};

#[derive(Clone)]
pub struct AlertEngine {
    inner: Arc<Inner>,
}

struct Inner {
    store: Mutex<AlertStore>,
    fetcher: Arc<dyn PriceFetcher>,
    notifier: Arc<dyn NotificationSink>,
    // serializes evaluation passes (timer vs manual re-check)
    cycle: tokio::sync::Mutex<()>,
    wake: Notify,
}

pub struct AlertEngineBuilder {
    fetcher: Arc<dyn PriceFetcher>,
    storage: Arc<dyn PersistentStore>,
    notifier: Arc<dyn NotificationSink>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
    consent: bool,
}

impl AlertEngineBuilder {
    pub fn analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    pub fn consent(mut self, granted: bool) -> Self {
        self.consent = granted;
        self
    }

    pub fn build(self) -> AlertEngine {
        let mut store = AlertStore::new(self.storage, self.analytics);
        store.initialize(self.consent);

        AlertEngine {
            inner: Arc::new(Inner {
                store: Mutex::new(store),
                fetcher: self.fetcher,
                notifier: self.notifier,
                cycle: tokio::sync::Mutex::new(()),
                wake: Notify::new(),
            }),
        }
    }
}

impl AlertEngine {
    pub fn builder(
        fetcher: Arc<dyn PriceFetcher>,
        storage: Arc<dyn PersistentStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> AlertEngineBuilder {
        AlertEngineBuilder {
            fetcher,
            storage,
            notifier,
            analytics: None,
            consent: false,
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.inner.store.lock().alerts().to_vec()
    }

    pub fn active_alerts(&self) -> Vec<Alert> {
        self.inner.store.lock().active_snapshot(None)
    }

    pub fn get(&self, id: &str) -> Option<Alert> {
        self.inner.store.lock().get(id).cloned()
    }

    pub fn consent_granted(&self) -> bool {
        self.inner.store.lock().consent_granted()
    }

    pub fn add_alert(&self, draft: AlertDraft) -> Result<Alert> {
        let alert = self.inner.store.lock().add(draft)?;
        tracing::info!(alert_id = %alert.id, item_id = alert.item_id, "price alert added");

        self.inner.wake.notify_one();
        Ok(alert)
    }

    pub fn remove_alert(&self, id: &str) -> bool {
        let removed = self.inner.store.lock().remove(id);
        if removed {
            tracing::info!(alert_id = %id, "price alert removed");
        }
        removed
    }

    /// `Ok(false)` when the alert is unknown or already triggered.
    pub fn update_alert(&self, id: &str, patch: AlertUpdate) -> Result<bool> {
        let updated = self.inner.store.lock().update(id, patch)?;
        if updated {
            tracing::info!(alert_id = %id, "price alert updated");
        }
        Ok(updated)
    }

    pub fn clear_all_alerts_and_storage(&self) {
        self.inner.store.lock().clear_all();
        tracing::info!("all price alerts cleared");
    }

    pub fn set_consent(&self, granted: bool) {
        self.inner.store.lock().set_consent(granted);
        tracing::info!(granted, "storage consent changed");

        if granted {
            self.inner.wake.notify_one();
        }
    }

    /// Evaluates the active alerts now. `ids` narrows the pass to those
    /// alerts; `prices` supplies samples that take precedence over fetching.
    /// Nothing is checked while storage consent is withheld.
    pub async fn check_alerts(&self, ids: Option<&[String]>, prices: Option<&PriceMap>) -> CheckOutcome {
        let _cycle = self.inner.cycle.lock().await;

        let snapshot = {
            let store = self.inner.store.lock();
            if !store.consent_granted() {
                return CheckOutcome::default();
            }
            store.active_snapshot(ids)
        };

        if snapshot.is_empty() {
            return CheckOutcome::default();
        }

        alert_monitor::evaluate_snapshot(
            &self.inner.store,
            self.inner.fetcher.as_ref(),
            self.inner.notifier.as_ref(),
            snapshot,
            prices,
        )
        .await
    }

    /// "Refresh now": pulls every price in one batch request, then checks all
    /// active alerts against it. Items missing from the batch are fetched
    /// one by one, and a failed batch falls back to per-item requests.
    pub async fn refresh_now(&self) -> CheckOutcome {
        if !self.has_pending_work() {
            return CheckOutcome::default();
        }

        let prices = match self.inner.fetcher.fetch_all().await {
            Ok(prices) => prices,
            Err(e) => {
                tracing::warn!("batch price request failed, fetching per item: {}", e);
                PriceMap::new()
            }
        };

        self.check_alerts(None, Some(&prices)).await
    }

    pub(crate) fn has_pending_work(&self) -> bool {
        let store = self.inner.store.lock();
        store.consent_granted() && store.has_active()
    }

    pub(crate) async fn wait_for_work(&self) {
        self.inner.wake.notified().await;
    }
}
