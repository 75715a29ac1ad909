pub mod backup;
pub mod quotes;
