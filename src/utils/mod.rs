pub mod cache;
pub mod datetime;
pub mod env;
pub mod http;
pub mod serde;
