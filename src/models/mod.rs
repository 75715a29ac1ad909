//! Quote records shared by the store, the engine and the HTTP handlers

pub mod quote;
pub mod variation;

pub use quote::{QuoteAggregate, QuoteSample, RateRow};
pub use variation::{DaySummary, Variations};
