pub mod alert_monitor;
pub mod alert_store;
pub mod evaluator;
pub mod notifications;
pub mod price_fetcher;
pub mod storage;
