pub mod day;
pub mod history;
pub mod scrap;
