use std::{env, net::SocketAddr, path::PathBuf, time::Duration};

use crate::error::{AlertError, Result};

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub prices_api_base: String,
    pub prices_user_agent: String,
    pub http_timeout: Duration,

    pub check_interval: Duration,
    pub storage_path: PathBuf,
    pub storage_consent: bool,
}

impl Settings {
    /// Builds settings from a variable lookup, falling back to defaults for
    /// anything missing or unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3000);

        let prices_api_base = lookup("PRICES_API_BASE")
            .unwrap_or_else(|| "https://prices.runescape.wiki/api/v1/osrs".to_string());

        let prices_user_agent = lookup("PRICES_USER_AGENT")
            .unwrap_or_else(|| "price-alerts/0.1 (alert monitor)".to_string());

        let http_timeout = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);

        let check_interval = lookup("ALERT_CHECK_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(60)
            .max(1);

        let storage_path = lookup("ALERT_STORAGE_PATH")
            .unwrap_or_else(|| "data/storage.json".to_string());

        let storage_consent = lookup("STORAGE_CONSENT")
            .map(|s| matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Settings {
            host,
            port,
            prices_api_base,
            prices_user_agent,
            http_timeout: Duration::from_secs(http_timeout),
            check_interval: Duration::from_secs(check_interval),
            storage_path: PathBuf::from(storage_path),
            storage_consent,
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|e| AlertError::Config(format!("HOST {:?}: {}", self.host, e)))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    Settings::from_lookup(|key| env::var(key).ok())
}
