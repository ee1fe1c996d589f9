pub mod alert;
pub mod price;

pub use alert::{sorted_for_display, Alert, AlertDraft, AlertStatus, AlertUpdate, Condition};
pub use price::{PriceMap, PriceSample};
