use crate::models::{Alert, Condition, PriceSample};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerDecision {
    NoTrigger,
    /// The side of the market this alert watches has no recent trade.
    Skip,
    Trigger { captured_price: f64, captured_at: i64 },
}

/// Decides whether `alert` fires against `sample`. `below` watches the low
/// (instant-sell) price, `above` the high one; equality never fires.
pub fn evaluate(alert: &Alert, sample: &PriceSample, now: i64) -> TriggerDecision {
    if !alert.is_active() {
        return TriggerDecision::NoTrigger;
    }

    let value = match alert.condition {
        Condition::Below => sample.low,
        Condition::Above => sample.high,
    };
    let Some(value) = value else {
        return TriggerDecision::Skip;
    };

    let hit = match alert.condition {
        Condition::Below => value < alert.target_price,
        Condition::Above => value > alert.target_price,
    };

    if hit {
        TriggerDecision::Trigger {
            captured_price: value,
            captured_at: now,
        }
    } else {
        TriggerDecision::NoTrigger
    }
}
