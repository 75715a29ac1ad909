use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Map, Value};

use crate::{AppState, error::QuoteError, utils::cache::CacheKey};

/// Today's aggregate with the variation against yesterday
///
/// Responds with `{}` when nothing was stored today. Cached for a short TTL
/// per day, keyed by the start of the day.
pub async fn get_day_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, QuoteError> {
    let now = state.quote_service.now();
    let window = state.quote_service.window_at(now);
    let cache_key = CacheKey::new("day-summary")
        .with(window.today_start)
        .build();

    let body = state
        .cache
        .cached_json(cache_key, async {
            let summary = state.quote_service.day_summary_at(now).await?;
            match summary {
                Some(summary) => serde_json::to_value(summary).map_err(|e| {
                    QuoteError::InternalError(format!("Failed to serialize summary: {}", e))
                }),
                None => Ok(Value::Object(Map::new())),
            }
        })
        .await?;

    Ok(Json(body))
}
