//! Production rate source combining every upstream provider
//!
//! One request per provider, all in flight at once. The first failure fails
//! the whole fetch.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::bluelytics::BluelyticsClient;
use super::dolar_api::{DolarApiClient, ImpliedRate};
use super::rate_source::{RateSource, RawQuoteSet};
use super::ripio::RipioClient;
use crate::error::QuoteError;
use crate::utils::env::EnvVars;

pub struct UpstreamRates {
    bluelytics: BluelyticsClient,
    ripio: RipioClient,
    dolar_api: DolarApiClient,
}

impl UpstreamRates {
    pub fn new(bluelytics: BluelyticsClient, ripio: RipioClient, dolar_api: DolarApiClient) -> Self {
        Self {
            bluelytics,
            ripio,
            dolar_api,
        }
    }

    pub fn from_env(http_client: Client, env_vars: &EnvVars) -> Self {
        let timeout = Duration::from_secs(env_vars.fetch_timeout_secs.max(1));

        Self::new(
            BluelyticsClient::with_base_url(
                http_client.clone(),
                env_vars.bluelytics_api_base_url.clone(),
            )
            .with_timeout(timeout),
            RipioClient::with_base_url(http_client.clone(), env_vars.ripio_api_base_url.clone())
                .with_timeout(timeout),
            DolarApiClient::with_base_url(http_client, env_vars.dolar_api_base_url.clone())
                .with_timeout(timeout),
        )
    }
}

#[async_trait]
impl RateSource for UpstreamRates {
    fn source_name(&self) -> &'static str {
        "upstream"
    }

    async fn fetch_quotes(&self) -> Result<RawQuoteSet, QuoteError> {
        let (main, dai, ccl, mep) = tokio::try_join!(
            self.bluelytics.latest(),
            self.ripio.dai_buy_rate(),
            self.dolar_api.buy_rate(ImpliedRate::Ccl),
            self.dolar_api.buy_rate(ImpliedRate::Mep),
        )?;

        let quotes = RawQuoteSet::from_fetched(main.oficial, main.blue, mep, ccl, dai);
        log::info!("Fetched quotes: {:?}", quotes);

        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_all(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v2/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "oficial": { "value_sell": 100.0, "value_buy": 95.0 },
                "blue": { "value_sell": 200.0, "value_buy": 195.0 }
            })))
            .mount(mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v3/public/rates/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "ticker": "DAI_ARS", "buy_rate": "170.00", "sell_rate": "175.00" }
            ])))
            .mount(mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/contadoliqui"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "compra": "160.00" })),
            )
            .mount(mock_server)
            .await;
    }

    fn upstream(base_url: &str, timeout: Duration) -> UpstreamRates {
        let client = Client::new();
        UpstreamRates::new(
            BluelyticsClient::with_base_url(client.clone(), base_url.to_string())
                .with_timeout(timeout),
            RipioClient::with_base_url(client.clone(), base_url.to_string()).with_timeout(timeout),
            DolarApiClient::with_base_url(client, base_url.to_string()).with_timeout(timeout),
        )
    }

    #[tokio::test]
    async fn test_fetch_quotes_maps_every_field() {
        let mock_server = MockServer::start().await;
        mount_all(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/api/dolarbolsa"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "compra": "150.00" })),
            )
            .mount(&mock_server)
            .await;

        let quotes = upstream(&mock_server.uri(), Duration::from_secs(5))
            .fetch_quotes()
            .await
            .unwrap();

        assert_eq!(quotes.oficial, 100.0);
        assert!((quotes.solidario - 165.0).abs() < 1e-9);
        assert_eq!(quotes.blue, 200.0);
        assert_eq!(quotes.mep, 150.0);
        assert_eq!(quotes.ccl, 160.0);
        assert_eq!(quotes.dai, 170.0);
    }

    #[tokio::test]
    async fn test_one_failing_provider_fails_the_fetch() {
        let mock_server = MockServer::start().await;
        mount_all(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/api/dolarbolsa"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let result = upstream(&mock_server.uri(), Duration::from_secs(5))
            .fetch_quotes()
            .await;

        assert!(matches!(
            result,
            Err(QuoteError::Upstream { provider: "dolar-api-mep", .. })
        ));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mock_server = MockServer::start().await;
        mount_all(&mock_server).await;
        Mock::given(method("GET"))
            .and(path("/api/dolarbolsa"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "compra": "150.00" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let result = upstream(&mock_server.uri(), Duration::from_millis(100))
            .fetch_quotes()
            .await;

        assert!(matches!(
            result,
            Err(QuoteError::UpstreamTimeout { provider: "dolar-api-mep" })
        ));
    }
}
