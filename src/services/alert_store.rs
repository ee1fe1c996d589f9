use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{alert::validate_target_price, Alert, AlertDraft, AlertStatus, AlertUpdate},
    services::{
        notifications::{AnalyticsSink, EVENT_REMOVE_ALERT, EVENT_UPDATE_ALERT},
        storage::{PersistentStore, ALERTS_STORAGE_KEY},
    },
};

pub fn serialize_alerts(alerts: &[Alert]) -> Result<String> {
    Ok(serde_json::to_string(alerts)?)
}

pub fn deserialize_alerts(raw: &str) -> Result<Vec<Alert>> {
    Ok(serde_json::from_str(raw)?)
}

/// Canonical in-memory alert collection, mirrored wholesale into the
/// persistent store after every mutation while storage consent holds.
pub struct AlertStore {
    alerts: Vec<Alert>,
    consent: bool,
    storage: Arc<dyn PersistentStore>,
    analytics: Option<Arc<dyn AnalyticsSink>>,
}

impl AlertStore {
    pub fn new(
        storage: Arc<dyn PersistentStore>,
        analytics: Option<Arc<dyn AnalyticsSink>>,
    ) -> Self {
        Self {
            alerts: Vec::new(),
            consent: false,
            storage,
            analytics,
        }
    }

    /// Seeds the collection from storage when consent is granted. Missing or
    /// unreadable data leaves the collection empty.
    pub fn initialize(&mut self, consent: bool) {
        self.consent = consent;
        self.alerts = if consent { self.load() } else { Vec::new() };
    }

    fn load(&self) -> Vec<Alert> {
        let Some(raw) = self.storage.get(ALERTS_STORAGE_KEY) else {
            return Vec::new();
        };

        match deserialize_alerts(&raw) {
            Ok(alerts) => {
                tracing::info!("loaded {} stored price alerts", alerts.len());
                alerts
            }
            Err(e) => {
                tracing::warn!("failed to parse stored price alerts, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    pub fn consent_granted(&self) -> bool {
        self.consent
    }

    /// Revoking clears memory but leaves whatever was already stored.
    /// Granting adopts stored alerts if nothing was created meanwhile,
    /// otherwise the current collection is written out.
    pub fn set_consent(&mut self, granted: bool) {
        if granted == self.consent {
            return;
        }

        self.consent = granted;
        if !granted {
            self.alerts.clear();
            return;
        }

        if self.alerts.is_empty() {
            self.alerts = self.load();
        } else {
            self.persist();
        }
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    pub fn has_active(&self) -> bool {
        self.alerts.iter().any(Alert::is_active)
    }

    /// Point-in-time copy of the active alerts, optionally restricted to `ids`.
    pub fn active_snapshot(&self, ids: Option<&[String]>) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|a| a.is_active())
            .filter(|a| ids.is_none_or(|ids| ids.iter().any(|id| *id == a.id)))
            .cloned()
            .collect()
    }

    pub fn add(&mut self, draft: AlertDraft) -> Result<Alert> {
        draft.validate()?;

        let alert = Alert {
            id: Uuid::new_v4().to_string(),
            item_id: draft.item_id,
            item_name: draft.item_name,
            item_icon: draft.item_icon,
            target_price: draft.target_price,
            condition: draft.condition,
            created_at: Utc::now().timestamp_millis(),
            status: AlertStatus::Active,
        };

        self.alerts.push(alert.clone());
        self.persist();

        Ok(alert)
    }

    /// Returns whether an alert was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.alerts.iter().position(|a| a.id == id) else {
            return false;
        };

        let alert = &self.alerts[pos];
        self.track(
            EVENT_REMOVE_ALERT,
            json!({ "item_id": alert.item_id, "item_name": alert.item_name }),
        );

        self.alerts.remove(pos);
        self.persist();
        true
    }

    /// Applies the patch to an active alert. Missing or triggered alerts are
    /// left alone and `Ok(false)` is returned.
    pub fn update(&mut self, id: &str, patch: AlertUpdate) -> Result<bool> {
        validate_target_price(patch.target_price)?;

        let Some(pos) = self.alerts.iter().position(|a| a.id == id && a.is_active()) else {
            return Ok(false);
        };

        let alert = &self.alerts[pos];
        self.track(
            EVENT_UPDATE_ALERT,
            json!({
                "item_id": alert.item_id,
                "item_name": alert.item_name,
                "target_price": patch.target_price,
                "condition": patch.condition,
            }),
        );

        let alert = &mut self.alerts[pos];
        alert.target_price = patch.target_price;
        alert.condition = patch.condition;
        self.persist();

        Ok(true)
    }

    /// Moves an active alert to triggered and returns the updated record.
    /// `None` when the alert is gone or has already fired.
    pub fn mark_triggered(&mut self, id: &str, price_at_trigger: f64, triggered_at: i64) -> Option<Alert> {
        let alert = self.alerts.iter_mut().find(|a| a.id == id && a.is_active())?;

        alert.status = AlertStatus::Triggered {
            price_at_trigger,
            triggered_at,
        };
        let updated = alert.clone();
        self.persist();

        Some(updated)
    }

    pub fn clear_all(&mut self) {
        self.alerts.clear();
        self.persist();
    }

    fn track(&self, event: &str, params: serde_json::Value) {
        if !self.consent {
            return;
        }
        if let Some(analytics) = &self.analytics {
            analytics.track(event, params);
        }
    }

    fn persist(&self) {
        if !self.consent {
            return;
        }

        let res = serialize_alerts(&self.alerts)
            .and_then(|raw| self.storage.set(ALERTS_STORAGE_KEY, &raw));

        if let Err(e) = res {
            tracing::error!("failed to persist price alerts: {}", e);
        }
    }
}
