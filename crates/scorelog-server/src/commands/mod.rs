pub mod reports;
pub mod serve;
