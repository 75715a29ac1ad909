use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

/// Epoch bounds used by the day summary and compaction queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// Midnight that starts the current day
    pub today_start: i64,
    /// Midnight that ends the current day
    pub today_end: i64,
    /// End of the day two days ago, i.e. the start of yesterday.
    /// Yesterday's data is `[boundary, today_start]` and its historical row
    /// is stamped with this value.
    pub boundary: i64,
}

impl DayWindow {
    pub fn at(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = local_date(now.timestamp(), offset);
        let two_days_ago = today - Days::new(2);

        Self {
            today_start: start_of_day(today, offset),
            today_end: end_of_day(today, offset),
            boundary: end_of_day(two_days_ago, offset),
        }
    }
}

/// Calendar date of an epoch timestamp in the given offset
pub fn local_date(timestamp: i64, offset: FixedOffset) -> NaiveDate {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc.with_timezone(&offset).date_naive(),
        None => NaiveDate::default(),
    }
}

/// Epoch seconds of `date` 00:00:00 in the given offset
pub fn start_of_day(date: NaiveDate, offset: FixedOffset) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp() - i64::from(offset.local_minus_utc())
}

/// Epoch seconds of the midnight that ends `date` (`date` 24:00:00)
pub fn end_of_day(date: NaiveDate, offset: FixedOffset) -> i64 {
    start_of_day(date, offset) + SECONDS_PER_DAY
}

/// Start of the calendar day containing `timestamp`
pub fn day_start_of(timestamp: i64, offset: FixedOffset) -> i64 {
    start_of_day(local_date(timestamp, offset), offset)
}

/// Builds a fixed offset from minutes east of UTC, falling back to UTC when
/// the value is out of range.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}
