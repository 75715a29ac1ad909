//! Ripio public rates client for the DAI stablecoin rate

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::QuoteError;
use crate::utils::http::{DEFAULT_TIMEOUT, get_json};
use crate::utils::serde::parse_decimal;

/// Ticker whose buy rate is reported as `dai`
pub const DAI_TICKER: &str = "DAI_ARS";

const PROVIDER: &str = "ripio";

/// One entry of /api/v3/public/rates/ (values are decimal strings)
#[derive(Debug, Clone, Deserialize)]
pub struct RipioListing {
    pub ticker: String,
    pub buy_rate: String,
    #[allow(dead_code)]
    pub sell_rate: Option<String>,
    #[allow(dead_code)]
    pub variation: Option<String>,
}

/// Buy rate of the first listing matching `ticker`
pub fn buy_rate_for(listings: &[RipioListing], ticker: &str) -> Result<f64, QuoteError> {
    let listing = listings
        .iter()
        .find(|item| item.ticker == ticker)
        .ok_or_else(|| QuoteError::malformed(PROVIDER, format!("ticker {} not listed", ticker)))?;

    parse_decimal(&listing.buy_rate).map_err(|e| QuoteError::malformed(PROVIDER, e))
}

pub struct RipioClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl RipioClient {
    pub fn with_base_url(http_client: Client, base_url: String) -> Self {
        Self {
            http_client,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn dai_buy_rate(&self) -> Result<f64, QuoteError> {
        let url = format!(
            "{}/api/v3/public/rates/?country=AR",
            self.base_url.trim_end_matches('/')
        );
        let listings: Vec<RipioListing> =
            get_json(&self.http_client, PROVIDER, &url, self.timeout).await?;

        let dai = buy_rate_for(&listings, DAI_TICKER)?;
        log::debug!("Ripio: {} buy rate = {}", DAI_TICKER, dai);

        Ok(dai)
    }
}
