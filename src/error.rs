use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("invalid alert: {0}")]
    InvalidDraft(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("price request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("price API returned {status}: {body}")]
    PriceApi { status: u16, body: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AlertError>;
