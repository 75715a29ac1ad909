use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::QuoteError;

/// Default per-request timeout for upstream calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Attempts per request: the first try plus one retry
const MAX_ATTEMPTS: u32 = 2;

const RETRY_DELAY: Duration = Duration::from_millis(250);

struct AttemptError {
    error: QuoteError,
    retryable: bool,
}

/// Fetches and decodes a JSON document from an upstream provider
///
/// Transport errors, timeouts and 5xx responses are retried once. 4xx
/// responses and undecodable bodies fail immediately.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    provider: &'static str,
    url: &str,
    timeout: Duration,
) -> Result<T, QuoteError> {
    let mut attempt = 1;

    loop {
        match get_json_once(client, provider, url, timeout).await {
            Ok(value) => return Ok(value),
            Err(AttemptError { error, retryable }) if retryable && attempt < MAX_ATTEMPTS => {
                log::warn!(
                    "{} request failed (attempt {}/{}), retrying: {}",
                    provider,
                    attempt,
                    MAX_ATTEMPTS,
                    error
                );
                attempt += 1;
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(AttemptError { error, .. }) => return Err(error),
        }
    }
}

async fn get_json_once<T: DeserializeOwned>(
    client: &Client,
    provider: &'static str,
    url: &str,
    timeout: Duration,
) -> Result<T, AttemptError> {
    log::debug!("Fetching {} quotes from {}", provider, url);

    let response = client
        .get(url)
        .header("accept", "application/json")
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| transport_error(provider, e))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        log::warn!("{} API error: {} - {}", provider, status, error_text);
        return Err(AttemptError {
            error: QuoteError::upstream(provider, format!("HTTP {}", status)),
            retryable: status.is_server_error(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| transport_error(provider, e))?;

    serde_json::from_slice(&body).map_err(|e| AttemptError {
        error: QuoteError::malformed(provider, e.to_string()),
        retryable: false,
    })
}

fn transport_error(provider: &'static str, e: reqwest::Error) -> AttemptError {
    let error = if e.is_timeout() {
        QuoteError::UpstreamTimeout { provider }
    } else {
        QuoteError::upstream(provider, e.to_string())
    };

    AttemptError {
        error,
        retryable: true,
    }
}
