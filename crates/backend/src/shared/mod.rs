pub mod coercion;
pub mod column_detect;
pub mod config;
pub mod dataset;
pub mod indicators;
