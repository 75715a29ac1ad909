//! SQLite persistence for quote samples
//!
//! Two tables with identical columns:
//! - `cotizacion_actual`: fine grained samples for today and the trailing
//!   day that has not been compacted yet
//! - `cotizacion_historico`: one averaged row per day, stamped with the start
//!   of that day
//!
//! Writers are serialized through an in-process lock and every
//! multi-statement write runs in a transaction, so a compaction cannot race an
//! ingest into double-migrating rows.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::error::QuoteError;
use crate::models::{QuoteAggregate, QuoteSample, RateRow};

const AGGREGATE_WINDOW_SQL: &str = r#"
    SELECT MAX(time) AS time,
           AVG(oficial) AS oficial,
           AVG(solidario) AS solidario,
           AVG(blue) AS blue,
           AVG(mep) AS mep,
           AVG(ccl) AS ccl,
           AVG(dai) AS dai
    FROM cotizacion_actual
    WHERE time BETWEEN ? AND ?
"#;

const VARIATION_PAIR_SQL: &str = r#"
    SELECT 0 AS part, time, oficial, solidario, blue, mep, ccl, dai
    FROM cotizacion_historico
    WHERE time = ?
    UNION ALL
    SELECT 1 AS part,
           MAX(time) AS time,
           AVG(oficial) AS oficial,
           AVG(solidario) AS solidario,
           AVG(blue) AS blue,
           AVG(mep) AS mep,
           AVG(ccl) AS ccl,
           AVG(dai) AS dai
    FROM cotizacion_actual
    WHERE time BETWEEN ? AND ?
    ORDER BY part
"#;

/// Result of compacting one window into history
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MigrateOutcome {
    /// No samples in the window, nothing changed
    Empty,
    /// A new historical row was written and the samples purged
    Written(QuoteAggregate),
    /// History already had a row for the boundary; the samples were purged
    Discarded { purged: u64 },
}

impl MigrateOutcome {
    /// The historical row written by this compaction, if any
    pub fn written(self) -> Option<QuoteAggregate> {
        match self {
            MigrateOutcome::Written(aggregate) => Some(aggregate),
            _ => None,
        }
    }
}

/// Handle to the quote database
///
/// Cheap to clone; clones share the pool and the write lock.
#[derive(Clone)]
pub struct QuoteStore {
    pool: SqlitePool,
    write_lock: Arc<Mutex<()>>,
}

impl QuoteStore {
    /// Wraps an existing pool. Migrations are not applied.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Opens (creating if missing) the SQLite database at `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, QuoteError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        // Every connection to an in-memory database is a separate database
        let max_connections = if database_url.contains(":memory:") {
            1
        } else {
            max_connections.max(1)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn run_migrations(&self) -> Result<(), QuoteError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn ping(&self) -> Result<(), QuoteError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Appends one sample to the current window table
    pub async fn insert(&self, sample: &QuoteSample) -> Result<(), QuoteError> {
        let _guard = self.write_lock.lock().await;

        sqlx::query(
            r#"
            INSERT INTO cotizacion_actual (oficial, solidario, blue, mep, ccl, dai, time)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sample.oficial)
        .bind(sample.solidario)
        .bind(sample.blue)
        .bind(sample.mep)
        .bind(sample.ccl)
        .bind(sample.dai)
        .bind(sample.time)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Mean of every current window row with `time` in `[from, to]`
    ///
    /// Returns `None` when no row matches.
    pub async fn aggregate_window(
        &self,
        from: i64,
        to: i64,
    ) -> Result<Option<QuoteAggregate>, QuoteError> {
        let row: RateRow = sqlx::query_as(AGGREGATE_WINDOW_SQL)
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into_sample())
    }

    /// Compacts `[from, to]` into one historical row stamped `boundary`
    ///
    /// Aggregate, insert and delete run in one transaction. If history
    /// already holds a row for `boundary` it is kept as is and the samples
    /// are still purged.
    pub async fn migrate(
        &self,
        from: i64,
        to: i64,
        boundary: i64,
    ) -> Result<MigrateOutcome, QuoteError> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let row: RateRow = sqlx::query_as(AGGREGATE_WINDOW_SQL)
            .bind(from)
            .bind(to)
            .fetch_one(&mut *tx)
            .await?;

        let Some(mut aggregate) = row.into_sample() else {
            tx.rollback().await?;
            return Ok(MigrateOutcome::Empty);
        };
        aggregate.time = boundary;

        let inserted = sqlx::query(
            r#"
            INSERT INTO cotizacion_historico (oficial, solidario, blue, mep, ccl, dai, time)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (time) DO NOTHING
            "#,
        )
        .bind(aggregate.oficial)
        .bind(aggregate.solidario)
        .bind(aggregate.blue)
        .bind(aggregate.mep)
        .bind(aggregate.ccl)
        .bind(aggregate.dai)
        .bind(aggregate.time)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            log::warn!(
                "Historical row for {} already exists, discarding late samples in [{}, {}]",
                boundary,
                from,
                to
            );
        }

        let deleted = sqlx::query("DELETE FROM cotizacion_actual WHERE time BETWEEN ? AND ?")
            .bind(from)
            .bind(to)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        if inserted == 0 {
            return Ok(MigrateOutcome::Discarded { purged: deleted });
        }

        log::info!(
            "Compacted {} samples in [{}, {}] into historical row {}",
            deleted,
            from,
            to,
            boundary
        );

        Ok(MigrateOutcome::Written(aggregate))
    }

    /// The historical row at exactly `boundary` (if any) followed by the
    /// aggregate of `[from, to]`
    ///
    /// The aggregate row is always present but may be unpopulated.
    pub async fn variation_pair(
        &self,
        boundary: i64,
        from: i64,
        to: i64,
    ) -> Result<Vec<RateRow>, QuoteError> {
        let rows: Vec<RateRow> = sqlx::query_as(VARIATION_PAIR_SQL)
            .bind(boundary)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Earliest current window sample strictly before `before`
    pub async fn oldest_actual_before(&self, before: i64) -> Result<Option<i64>, QuoteError> {
        let oldest: Option<i64> =
            sqlx::query_scalar("SELECT MIN(time) FROM cotizacion_actual WHERE time < ?")
                .bind(before)
                .fetch_one(&self.pool)
                .await?;

        Ok(oldest)
    }

    /// Historical rows with `time` in `[from, to]`, oldest first
    pub async fn historical_range(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<Vec<QuoteSample>, QuoteError> {
        let rows: Vec<QuoteSample> = sqlx::query_as(
            r#"
            SELECT time, oficial, solidario, blue, mep, ccl, dai
            FROM cotizacion_historico
            WHERE time BETWEEN ? AND ?
            ORDER BY time ASC
            "#,
        )
        .bind(from.unwrap_or(i64::MIN))
        .bind(to.unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Writes a consistent copy of the whole database to `path`
    pub async fn backup_to(&self, path: &Path) -> Result<(), QuoteError> {
        let target = path.to_str().ok_or_else(|| {
            QuoteError::InternalError(format!("Backup path is not valid UTF-8: {:?}", path))
        })?;

        sqlx::query("VACUUM INTO ?")
            .bind(target)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
