use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{AppState, error::QuoteError, models::QuoteSample};

#[derive(Deserialize, Debug, Default)]
pub struct HistoryQuery {
    /// Inclusive lower bound, epoch seconds
    pub from: Option<i64>,
    /// Inclusive upper bound, epoch seconds
    pub to: Option<i64>,
}

/// Compacted daily rows, oldest first
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<QuoteSample>>, QuoteError> {
    let rows = state.quote_service.history(query.from, query.to).await?;
    Ok(Json(rows))
}
