use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::extract::State;
use chrono::Utc;

use crate::{AppState, error::QuoteError, services::QuoteStore};

/// Starts a copy of the whole database in the background
///
/// Always answers immediately; the outcome is only logged.
pub async fn trigger_backup(State(state): State<Arc<AppState>>) -> &'static str {
    let store = state.store.clone();
    let backup_dir = PathBuf::from(&state.env_vars.backup_dir);

    tokio::spawn(async move {
        match run_backup(&store, &backup_dir).await {
            Ok(path) => log::info!("Backup complete: {}", path.display()),
            Err(e) => log::error!("Backup failed: {}", e),
        }
    });

    "backup in progress"
}

/// Writes `backup-<unix millis>.sqlite` into `backup_dir`
pub async fn run_backup(store: &QuoteStore, backup_dir: &Path) -> Result<PathBuf, QuoteError> {
    tokio::fs::create_dir_all(backup_dir).await.map_err(|e| {
        QuoteError::InternalError(format!(
            "Failed to create backup directory {}: {}",
            backup_dir.display(),
            e
        ))
    })?;

    let path = backup_dir.join(format!("backup-{}.sqlite", Utc::now().timestamp_millis()));
    store.backup_to(&path).await?;

    Ok(path)
}
