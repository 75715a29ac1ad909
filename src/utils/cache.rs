use moka::future::Cache as MokaCache;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::QuoteError;

/// Short lived cache for computed API responses
///
/// Entries are stored as JSON so handlers can return them without
/// re-serializing. Ingestion invalidates everything since a new sample
/// changes every aggregate. Results computed before an invalidation are
/// never stored after it.
#[derive(Clone)]
pub struct Cache {
    responses: MokaCache<String, Value>,
    generation: Arc<AtomicU64>,
}

impl Cache {
    /// Create a cache with the default configuration (100 entries, 30 seconds TTL)
    pub fn new() -> Self {
        Self::with_ttl(30)
    }

    pub fn with_ttl(ttl_secs: u64) -> Self {
        let responses = MokaCache::builder()
            .max_capacity(100)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            responses,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns the cached JSON for `cache_key`, or runs `fetch_fn` and caches
    /// its serialized result. Errors are never cached.
    pub async fn cached_json<F, T>(&self, cache_key: String, fetch_fn: F) -> Result<Value, QuoteError>
    where
        F: std::future::Future<Output = Result<T, QuoteError>>,
        T: Serialize,
    {
        if let Some(cached_data) = self.responses.get(&cache_key).await {
            log::debug!("Cache hit for {}", cache_key);
            return Ok(cached_data);
        }

        let started_at = self.generation.load(Ordering::SeqCst);
        let result = fetch_fn.await?;

        let result_value = serde_json::to_value(&result).map_err(|e| {
            QuoteError::InternalError(format!("Failed to serialize result: {}", e))
        })?;

        if self.generation.load(Ordering::SeqCst) != started_at {
            log::debug!("Cache invalidated while computing {}, not storing", cache_key);
            return Ok(result_value);
        }

        self.responses
            .insert(cache_key.clone(), result_value.clone())
            .await;

        // Invalidated between the check and the insert
        if self.generation.load(Ordering::SeqCst) != started_at {
            self.responses.invalidate(&cache_key).await;
        }

        Ok(result_value)
    }

    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.responses.invalidate_all();
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to build consistent cache keys across the application
pub struct CacheKey {
    namespace: String,
    parts: Vec<String>,
}

impl CacheKey {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            parts: Vec::new(),
        }
    }

    pub fn with(mut self, part: impl Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    pub fn build(self) -> String {
        if self.parts.is_empty() {
            self.namespace
        } else {
            format!("{}:{}", self.namespace, self.parts.join(":"))
        }
    }
}
