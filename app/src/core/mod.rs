pub mod persistence;
pub mod time;
pub mod timeseries;
pub mod unit;
