pub mod config;
pub mod error;
pub mod lifecycle;
pub mod listings;
pub mod store;
pub mod telemetry;
