#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use dolar_be::AppState;
use dolar_be::models::QuoteSample;
use dolar_be::services::QuoteStore;
use dolar_be::utils::env::EnvVars;
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Quotes served by the mocked providers
pub struct ProviderQuotes {
    pub oficial: f64,
    pub blue: f64,
    pub mep: f64,
    pub ccl: f64,
    pub dai: f64,
}

impl Default for ProviderQuotes {
    fn default() -> Self {
        Self {
            oficial: 100.0,
            blue: 200.0,
            mep: 150.0,
            ccl: 160.0,
            dai: 170.0,
        }
    }
}

/// Mounts realistic responses for every upstream provider on one mock server
pub async fn mount_providers(mock_server: &MockServer, quotes: &ProviderQuotes) {
    Mock::given(method("GET"))
        .and(path("/v2/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "oficial": { "value_avg": quotes.oficial - 5.0, "value_sell": quotes.oficial, "value_buy": quotes.oficial - 10.0 },
            "blue": { "value_avg": quotes.blue - 5.0, "value_sell": quotes.blue, "value_buy": quotes.blue - 10.0 },
            "last_update": "2023-10-18T15:28:25.129378-03:00"
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/public/rates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "ticker": "BTC_ARS", "buy_rate": "25000000.00", "sell_rate": "26000000.00", "variation": "1.20" },
            { "ticker": "DAI_ARS", "buy_rate": format!("{:.2}", quotes.dai), "sell_rate": "999.00", "variation": "0.10" }
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/dolarbolsa"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fecha": "18/10/2023 - 15:30",
            "compra": format!("{:.2}", quotes.mep),
            "venta": "999.00"
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/contadoliqui"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "fecha": "18/10/2023 - 15:30",
            "compra": format!("{:.2}", quotes.ccl),
            "venta": "999.00"
        })))
        .mount(mock_server)
        .await;
}

/// Environment pointing every provider at `mock_uri`, days in UTC
pub fn test_env_vars(mock_uri: &str) -> EnvVars {
    let mut env_vars = EnvVars::default();
    env_vars.bluelytics_api_base_url = mock_uri.to_string();
    env_vars.ripio_api_base_url = mock_uri.to_string();
    env_vars.dolar_api_base_url = mock_uri.to_string();
    env_vars.utc_offset_minutes = 0;
    env_vars.fetch_timeout_secs = 2;
    env_vars
}

/// Fixed "now" seen by the app under test, midday so no request crosses midnight
pub fn pinned_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 11, 12, 0, 0)
        .single()
        .expect("valid pinned time")
}

pub fn build_app(pool: SqlitePool, env_vars: EnvVars) -> (Router, Arc<AppState>) {
    let state = Arc::new(
        AppState::builder()
            .store(QuoteStore::new(pool))
            .env_vars(env_vars)
            .clock(pinned_now)
            .build()
            .expect("Failed to build test AppState"),
    );

    (dolar_be::routes::create_routes(state.clone()), state)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(app, uri).await;
    let json = serde_json::from_slice(&body).expect("response should be JSON");
    (status, json)
}

pub fn sample(oficial: f64, time: i64) -> QuoteSample {
    QuoteSample {
        oficial,
        solidario: oficial * 1.65,
        blue: 200.0,
        mep: 150.0,
        ccl: 160.0,
        dai: 170.0,
        time,
    }
}
