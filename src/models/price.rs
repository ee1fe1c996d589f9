use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Latest instant-buy (`high`) and instant-sell (`low`) trade for an item.
/// A side is `None` when the item has not traded on it recently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub high_time: Option<i64>,
    pub low_time: Option<i64>,
}

/// Item id => latest sample, as returned by a batch price request.
pub type PriceMap = HashMap<u32, PriceSample>;
