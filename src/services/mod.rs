//! Services module for upstream integrations, persistence and business logic

pub mod bluelytics;
pub mod dolar_api;
pub mod quote_service;
pub mod quote_store;
pub mod rate_source;
pub mod ripio;
pub mod upstream;

pub use quote_service::QuoteService;
pub use quote_store::{MigrateOutcome, QuoteStore};
pub use rate_source::{RateSource, RawQuoteSet};
pub use upstream::UpstreamRates;
