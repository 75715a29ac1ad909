use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::{
    error::QuoteError,
    services::{QuoteService, QuoteStore, UpstreamRates},
    utils::{cache::Cache, datetime::offset_from_minutes, env::EnvVars},
};

pub struct AppState {
    pub cache: Cache,
    pub env_vars: EnvVars,
    pub store: QuoteStore,
    pub quote_service: QuoteService<UpstreamRates>,
}

impl AppState {
    /// Initialize the application state with database connection and migrations
    pub async fn new() -> Result<AppState, Box<dyn std::error::Error>> {
        let env_vars = EnvVars::default();

        log::info!("Opening database {}...", env_vars.database_url);
        let store = QuoteStore::connect(&env_vars.database_url, env_vars.db_max_connections).await?;

        log::info!("Running database migrations...");
        store.run_migrations().await?;

        log::info!("Database connection established successfully");

        Ok(AppState::builder()
            .env_vars(env_vars)
            .store(store)
            .build()?)
    }

    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }
}

/// Builder used by `AppState::new` and by tests that inject their own store
#[derive(Default)]
pub struct AppStateBuilder {
    env_vars: Option<EnvVars>,
    store: Option<QuoteStore>,
    http_client: Option<reqwest::Client>,
    clock: Option<fn() -> DateTime<Utc>>,
}

impl AppStateBuilder {
    pub fn env_vars(mut self, env_vars: EnvVars) -> Self {
        self.env_vars = Some(env_vars);
        self
    }

    pub fn store(mut self, store: QuoteStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Pins the clock used for day windows and sample timestamps
    pub fn clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<AppState, QuoteError> {
        let env_vars = self.env_vars.unwrap_or_default();
        let store = self
            .store
            .ok_or_else(|| QuoteError::InternalError("AppState requires a store".to_string()))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(env_vars.fetch_timeout_secs.max(1)))
                .build()
                .map_err(|e| QuoteError::InternalError(format!("HTTP client: {}", e)))?,
        };

        let offset = offset_from_minutes(env_vars.utc_offset_minutes);
        log::info!("Day boundaries computed at UTC offset {}", offset);

        let mut quote_service = QuoteService::new(
            store.clone(),
            UpstreamRates::from_env(http_client, &env_vars),
            offset,
        );
        if let Some(clock) = self.clock {
            quote_service = quote_service.with_clock(clock);
        }

        Ok(AppState {
            cache: Cache::with_ttl(env_vars.day_summary_cache_ttl_secs),
            env_vars,
            store,
            quote_service,
        })
    }
}
