pub mod app_state;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

pub use app_state::AppState;
pub use error::QuoteError;
