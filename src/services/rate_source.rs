//! Rate source trait for fetching the current quotes
//!
//! The engine only depends on this trait, so tests can swap the upstream
//! providers for a fixed set of quotes.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::QuoteError;
use crate::models::QuoteSample;

/// Surcharge applied to the official rate to obtain the "solidario" rate
pub const SOLIDARIO_MULTIPLIER: f64 = 1.65;

/// Normalized quotes from every upstream provider, not yet timestamped
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct RawQuoteSet {
    pub oficial: f64,
    pub solidario: f64,
    pub blue: f64,
    pub mep: f64,
    pub ccl: f64,
    pub dai: f64,
}

impl RawQuoteSet {
    /// Builds the set from fetched values, deriving `solidario` from `oficial`
    pub fn from_fetched(oficial: f64, blue: f64, mep: f64, ccl: f64, dai: f64) -> Self {
        Self {
            oficial,
            solidario: oficial * SOLIDARIO_MULTIPLIER,
            blue,
            mep,
            ccl,
            dai,
        }
    }

    pub fn at(self, time: i64) -> QuoteSample {
        QuoteSample {
            oficial: self.oficial,
            solidario: self.solidario,
            blue: self.blue,
            mep: self.mep,
            ccl: self.ccl,
            dai: self.dai,
            time,
        }
    }
}

/// Trait for quote sources
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Returns the name of the source (e.g., "upstream")
    fn source_name(&self) -> &'static str;

    /// Fetches one complete set of quotes
    ///
    /// # Returns
    /// * `Ok(quotes)` - Every field populated
    /// * `Err(_)` - If any provider failed; partial results are never returned
    async fn fetch_quotes(&self) -> Result<RawQuoteSet, QuoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solidario_is_derived() {
        let quotes = RawQuoteSet::from_fetched(100.0, 200.0, 150.0, 160.0, 170.0);
        assert!((quotes.solidario - 165.0).abs() < 1e-9);
    }

    #[test]
    fn test_at_stamps_time() {
        let sample = RawQuoteSet::from_fetched(100.0, 200.0, 150.0, 160.0, 170.0).at(1_700_000_000);
        assert_eq!(sample.time, 1_700_000_000);
        assert_eq!(sample.oficial, 100.0);
        assert_eq!(sample.ccl, 160.0);
    }
}
