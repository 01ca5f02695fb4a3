pub mod config;
pub mod error;
pub mod marketplace;
pub mod scoring;
pub mod telemetry;
