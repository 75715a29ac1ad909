use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::{AppState, handlers};

async fn root() -> &'static str {
    "dolar-be is up"
}

async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    // Test database connection
    let db_connected = state.store.ping().await.is_ok();

    let pool_size = state.store.pool().size();
    let idle_connections = state.store.pool().num_idle();

    if !db_connected {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "database": {
                    "connected": false,
                    "error": "Database connection failed"
                }
            })),
        ));
    }

    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "database": {
            "connected": true,
            "pool_size": pool_size,
            "idle_connections": idle_connections
        }
    })))
}

pub fn create_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness
        .route("/", get(root))
        .route("/api/health", get(health_check))
        // Backup
        .route("/backup", get(handlers::backup::trigger::trigger_backup))
        // Quotes
        .route("/scrap", get(handlers::quotes::scrap::scrap_quotes))
        .route("/day", get(handlers::quotes::day::get_day_summary))
        .route("/history", get(handlers::quotes::history::get_history))
        .with_state(state)
}
