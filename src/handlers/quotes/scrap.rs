use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{AppState, error::QuoteError, models::QuoteSample};

/// Fetches fresh quotes from every provider and stores them as a new sample
///
/// Elapsed days are compacted into history before fetching. Responds with
/// the stored sample; upstream failures answer with a non-2xx status and
/// nothing is written.
pub async fn scrap_quotes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<QuoteSample>, QuoteError> {
    let sample = state.quote_service.ingest().await?;

    // Every cached aggregate is stale once a new sample lands
    state.cache.invalidate_all();

    Ok(Json(sample))
}
