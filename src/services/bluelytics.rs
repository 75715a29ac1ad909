//! Bluelytics API client for the official and parallel ("blue") rates

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::QuoteError;
use crate::utils::http::{DEFAULT_TIMEOUT, get_json};

const PROVIDER: &str = "bluelytics";

/// Response from /v2/latest
#[derive(Debug, Deserialize)]
struct LatestResponse {
    oficial: RatePair,
    blue: RatePair,
}

#[derive(Debug, Deserialize)]
struct RatePair {
    #[allow(dead_code)]
    value_buy: Option<f64>,
    value_sell: f64,
}

/// Sell side of the official and blue rates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BluelyticsRates {
    pub oficial: f64,
    pub blue: f64,
}

pub struct BluelyticsClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl BluelyticsClient {
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

    pub async fn latest(&self) -> Result<BluelyticsRates, QuoteError> {
        let url = format!("{}/v2/latest", self.base_url.trim_end_matches('/'));
        let data: LatestResponse = get_json(&self.http_client, PROVIDER, &url, self.timeout).await?;

        log::debug!(
            "Bluelytics: oficial = {}, blue = {}",
            data.oficial.value_sell,
            data.blue.value_sell
        );

        Ok(BluelyticsRates {
            oficial: data.oficial.value_sell,
            blue: data.blue.value_sell,
        })
    }
}
