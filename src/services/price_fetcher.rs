use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{AlertError, Result},
    models::{PriceMap, PriceSample},
};

#[async_trait]
pub trait PriceFetcher: Send + Sync {
    /// Latest sample for one item. `Ok(None)` means the API has no data for it.
    async fn fetch_price(&self, item_id: u32) -> Result<Option<PriceSample>>;

    /// Latest samples for every item, for batch refreshes. Implementations
    /// without a batch endpoint return an empty map, which makes the monitor
    /// fall back to per-item requests.
    async fn fetch_all(&self) -> Result<PriceMap> {
        Ok(PriceMap::new())
    }
}

/// Client for the game's real-time prices API (`/latest`).
#[derive(Clone)]
pub struct WikiPricesClient {
    http: Client,
    base_url: String,
}

impl WikiPricesClient {
    /// The API rejects requests without a descriptive User-Agent.
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn latest(&self, query: &[(&str, String)]) -> Result<LatestResponse> {
        let url = format!("{}/latest", self.base_url);
        let res = self.http.get(url).query(query).send().await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(AlertError::PriceApi { status, body });
        }

        Ok(res.json::<LatestResponse>().await?)
    }
}

#[async_trait]
impl PriceFetcher for WikiPricesClient {
    async fn fetch_price(&self, item_id: u32) -> Result<Option<PriceSample>> {
        let mut latest = self.latest(&[("id", item_id.to_string())]).await?;
        Ok(latest.data.remove(&item_id))
    }

    async fn fetch_all(&self) -> Result<PriceMap> {
        Ok(self.latest(&[]).await?.data)
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    data: PriceMap,
}
