use serde::{Deserialize, Serialize};

use crate::error::{AlertError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Above,
    Below,
}

/// Lifecycle state of an alert. The trigger fields only exist once the alert
/// has fired, so an active alert can never carry a trigger price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Triggered {
        #[serde(rename = "priceAtTrigger")]
        price_at_trigger: f64,
        #[serde(rename = "triggeredAt")]
        triggered_at: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub item_id: u32,
    pub item_name: String,
    pub item_icon: String,
    pub target_price: f64,
    pub condition: Condition,

    // ms since epoch
    pub created_at: i64,

    #[serde(flatten)]
    pub status: AlertStatus,
}

impl Alert {
    pub fn is_active(&self) -> bool {
        matches!(self.status, AlertStatus::Active)
    }

    pub fn price_at_trigger(&self) -> Option<f64> {
        match self.status {
            AlertStatus::Triggered { price_at_trigger, .. } => Some(price_at_trigger),
            AlertStatus::Active => None,
        }
    }

    pub fn triggered_at(&self) -> Option<i64> {
        match self.status {
            AlertStatus::Triggered { triggered_at, .. } => Some(triggered_at),
            AlertStatus::Active => None,
        }
    }
}

/// What the dashboard submits when the user creates an alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDraft {
    pub item_id: u32,
    pub item_name: String,
    pub item_icon: String,
    pub target_price: f64,
    pub condition: Condition,
}

impl AlertDraft {
    pub fn validate(&self) -> Result<()> {
        if self.item_name.trim().is_empty() {
            return Err(AlertError::InvalidDraft(format!(
                "item {} has an empty name",
                self.item_id
            )));
        }
        validate_target_price(self.target_price)
    }
}

/// Editable fields of an active alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertUpdate {
    pub target_price: f64,
    pub condition: Condition,
}

pub(crate) fn validate_target_price(target_price: f64) -> Result<()> {
    if !target_price.is_finite() || target_price <= 0.0 {
        return Err(AlertError::InvalidDraft(format!(
            "target price must be a positive number, got {target_price}"
        )));
    }
    Ok(())
}

/// Active alerts first, then triggered ones; newest first within each group.
pub fn sorted_for_display(alerts: &[Alert]) -> Vec<Alert> {
    let mut items = alerts.to_vec();
    items.sort_by(|a, b| {
        b.is_active()
            .cmp(&a.is_active())
            .then_with(|| {
                let ka = a.triggered_at().unwrap_or(a.created_at);
                let kb = b.triggered_at().unwrap_or(b.created_at);
                kb.cmp(&ka)
            })
    });
    items
}
