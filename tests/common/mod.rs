#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use price_alerts::{
    models::{Alert, AlertDraft, Condition, PriceMap, PriceSample},
    services::{
        notifications::{AnalyticsSink, NotificationSink},
        price_fetcher::PriceFetcher,
        storage::MemoryStorage,
    },
    AlertEngine, AlertError,
};
use serde_json::Value;
use tokio::sync::Notify;

pub const WHIP: u32 = 4151;

#[derive(Clone, Copy)]
pub enum Quote {
    Sample(PriceSample),
    NoData,
    Fails,
}

/// Scripted price source; unknown items have no data.
#[derive(Default)]
pub struct MockFetcher {
    quotes: Mutex<HashMap<u32, Quote>>,
    batch: Mutex<Option<PriceMap>>,
    calls: Mutex<Vec<u32>>,
}

impl MockFetcher {
    pub fn set(&self, item_id: u32, quote: Quote) {
        self.quotes.lock().insert(item_id, quote);
    }

    pub fn set_low(&self, item_id: u32, low: f64) {
        self.set(item_id, Quote::Sample(sample(Some(low), None)));
    }

    pub fn set_high(&self, item_id: u32, high: f64) {
        self.set(item_id, Quote::Sample(sample(None, Some(high))));
    }

    pub fn set_batch(&self, prices: PriceMap) {
        *self.batch.lock() = Some(prices);
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PriceFetcher for MockFetcher {
    async fn fetch_price(&self, item_id: u32) -> price_alerts::Result<Option<PriceSample>> {
        self.calls.lock().push(item_id);

        let quote = self.quotes.lock().get(&item_id).copied();
        match quote {
            Some(Quote::Sample(s)) => Ok(Some(s)),
            Some(Quote::NoData) | None => Ok(None),
            Some(Quote::Fails) => Err(AlertError::PriceApi {
                status: 503,
                body: "unavailable".to_string(),
            }),
        }
    }

    async fn fetch_all(&self) -> price_alerts::Result<PriceMap> {
        match self.batch.lock().clone() {
            Some(prices) => Ok(prices),
            None => Err(AlertError::PriceApi {
                status: 500,
                body: "no batch".to_string(),
            }),
        }
    }
}

/// Holds every `fetch_price` call until `release` is called, so a test can
/// act while a price request is in flight.
pub struct GatedFetcher {
    sample: PriceSample,
    entered: Notify,
    gate: Notify,
}

impl GatedFetcher {
    pub fn new(sample: PriceSample) -> Self {
        Self {
            sample,
            entered: Notify::new(),
            gate: Notify::new(),
        }
    }

    /// Resolves once a request is waiting at the gate.
    pub async fn in_flight(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl PriceFetcher for GatedFetcher {
    async fn fetch_price(&self, _item_id: u32) -> price_alerts::Result<Option<PriceSample>> {
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(Some(self.sample))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn seen(&self) -> Vec<Alert> {
        self.seen.lock().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, alert: &Alert) {
        self.seen.lock().push(alert.clone());
    }
}

#[derive(Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn track(&self, event: &str, params: Value) {
        self.events.lock().push((event.to_string(), params));
    }
}

pub fn sample(low: Option<f64>, high: Option<f64>) -> PriceSample {
    PriceSample {
        high,
        low,
        high_time: high.map(|_| 1_700_000_000),
        low_time: low.map(|_| 1_700_000_000),
    }
}

pub fn draft(item_id: u32, target_price: f64, condition: Condition) -> AlertDraft {
    AlertDraft {
        item_id,
        item_name: format!("Item {item_id}"),
        item_icon: format!("item_{item_id}.png"),
        target_price,
        condition,
    }
}

pub struct Harness {
    pub engine: AlertEngine,
    pub fetcher: Arc<MockFetcher>,
    pub storage: Arc<MemoryStorage>,
    pub notifier: Arc<RecordingNotifier>,
    pub analytics: Arc<RecordingAnalytics>,
}

pub fn harness(consent: bool) -> Harness {
    harness_with_storage(consent, MemoryStorage::new())
}

pub fn harness_with_storage(consent: bool, storage: MemoryStorage) -> Harness {
    let fetcher = Arc::new(MockFetcher::default());
    let storage = Arc::new(storage);
    let notifier = Arc::new(RecordingNotifier::default());
    let analytics = Arc::new(RecordingAnalytics::default());

    let engine = AlertEngine::builder(fetcher.clone(), storage.clone(), notifier.clone())
        .analytics(analytics.clone())
        .consent(consent)
        .build();

    Harness {
        engine,
        fetcher,
        storage,
        notifier,
        analytics,
    }
}
