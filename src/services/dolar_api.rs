//! Dolar Argentina API client for the stock-exchange implied rates
//!
//! - `/api/dolarbolsa` -> "mep"
//! - `/api/contadoliqui` -> "ccl"
//!
//! Both report the buy side (`compra`) as a decimal string.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::QuoteError;
use crate::utils::http::{DEFAULT_TIMEOUT, get_json};

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[allow(dead_code)]
    fecha: Option<String>,
    #[serde(deserialize_with = "crate::utils::serde::decimal")]
    compra: f64,
}

/// Which implied rate to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpliedRate {
    Mep,
    Ccl,
}

impl ImpliedRate {
    fn path(self) -> &'static str {
        match self {
            ImpliedRate::Mep => "api/dolarbolsa",
            ImpliedRate::Ccl => "api/contadoliqui",
        }
    }

    fn provider(self) -> &'static str {
        match self {
            ImpliedRate::Mep => "dolar-api-mep",
            ImpliedRate::Ccl => "dolar-api-ccl",
        }
    }
}

pub struct DolarApiClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl DolarApiClient {
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

    /// Buy side of the requested implied rate
    pub async fn buy_rate(&self, rate: ImpliedRate) -> Result<f64, QuoteError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), rate.path());
        let data: QuoteResponse =
            get_json(&self.http_client, rate.provider(), &url, self.timeout).await?;

        log::debug!("Dolar API: {:?} compra = {}", rate, data.compra);

        Ok(data.compra)
    }
}
