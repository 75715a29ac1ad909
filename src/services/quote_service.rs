//! Aggregation and compaction engine
//!
//! Orchestrates day windows, compaction of elapsed days into the historical
//! table, ingestion of new samples and day-over-day variations.

use chrono::{DateTime, FixedOffset, Utc};

use super::quote_store::{MigrateOutcome, QuoteStore};
use super::rate_source::RateSource;
use crate::error::QuoteError;
use crate::models::{DaySummary, QuoteSample, Variations};
use crate::utils::datetime::{DayWindow, day_start_of, end_of_day, local_date};

pub struct QuoteService<R: RateSource> {
    store: QuoteStore,
    source: R,
    offset: FixedOffset,
    clock: fn() -> DateTime<Utc>,
}

impl<R: RateSource> QuoteService<R> {
    pub fn new(store: QuoteStore, source: R, offset: FixedOffset) -> Self {
        Self {
            store,
            source,
            offset,
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock used by `day_summary` and `ingest`
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn window_at(&self, now: DateTime<Utc>) -> DayWindow {
        DayWindow::at(now, self.offset)
    }

    /// Moves every elapsed day still in the current window table into history
    ///
    /// Days older than yesterday are compacted first, one historical row per
    /// day stamped with that day's start. Then yesterday's samples
    /// `[boundary, today_start]` are compacted into the row stamped
    /// `boundary`. Returns how many historical rows were written.
    pub async fn compact(&self, window: &DayWindow) -> Result<usize, QuoteError> {
        let mut compacted = 0;

        while let Some(oldest) = self.store.oldest_actual_before(window.boundary).await? {
            let day_start = day_start_of(oldest, self.offset);
            // The next midnight belongs to the following day
            let last_second = (end_of_day(local_date(oldest, self.offset), self.offset) - 1)
                .min(window.boundary - 1);

            log::info!(
                "Back-filling history for stale samples in [{}, {}]",
                day_start,
                last_second
            );

            match self.store.migrate(day_start, last_second, day_start).await? {
                MigrateOutcome::Empty => break,
                MigrateOutcome::Written(_) => compacted += 1,
                MigrateOutcome::Discarded { .. } => {}
            }
        }

        let previous = self
            .store
            .aggregate_window(window.boundary, window.today_start)
            .await?;

        if previous.is_some() {
            let outcome = self
                .store
                .migrate(window.boundary, window.today_start, window.boundary)
                .await?;
            if let MigrateOutcome::Written(_) = outcome {
                compacted += 1;
            }
        }

        Ok(compacted)
    }

    pub async fn day_summary(&self) -> Result<Option<DaySummary>, QuoteError> {
        self.day_summary_at(self.now()).await
    }

    /// Today's aggregate plus the variation against yesterday's historical row
    ///
    /// Returns `None` when no sample was stored today.
    pub async fn day_summary_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<DaySummary>, QuoteError> {
        let window = self.window_at(now);

        let current = self
            .store
            .aggregate_window(window.today_start, window.today_end)
            .await?;

        self.compact(&window).await?;

        let Some(current) = current else {
            log::debug!("No samples for the day starting at {}", window.today_start);
            return Ok(None);
        };

        let mut pair = self
            .store
            .variation_pair(window.boundary, window.today_start, window.today_end)
            .await?
            .into_iter();

        let variations = match (pair.next(), pair.next()) {
            (Some(previous), Some(latest)) if previous.is_populated() && latest.is_populated() => {
                match (previous.into_sample(), latest.into_sample()) {
                    (Some(previous), Some(latest)) => Some(Variations::between(&previous, &latest)),
                    _ => None,
                }
            }
            _ => None,
        };

        Ok(Some(DaySummary {
            quote: current,
            variations,
        }))
    }

    pub async fn ingest(&self) -> Result<QuoteSample, QuoteError> {
        self.ingest_at(self.now()).await
    }

    /// Compacts elapsed days, fetches fresh quotes and stores them as a
    /// sample stamped `now`
    ///
    /// Nothing is written when the fetch fails.
    pub async fn ingest_at(&self, now: DateTime<Utc>) -> Result<QuoteSample, QuoteError> {
        let window = self.window_at(now);
        self.compact(&window).await?;

        let quotes = self.source.fetch_quotes().await.map_err(|e| {
            log::warn!("Fetching from {} failed: {}", self.source.source_name(), e);
            e
        })?;

        let sample = quotes.at(now.timestamp());
        self.store.insert(&sample).await?;

        log::info!("Stored sample at {}: {:?}", sample.time, sample);

        Ok(sample)
    }

    /// Historical rows in `[from, to]`, oldest first
    pub async fn history(
        &self,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<Vec<QuoteSample>, QuoteError> {
        self.store.historical_range(from, to).await
    }
}
