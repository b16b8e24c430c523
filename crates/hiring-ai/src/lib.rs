pub mod artifact;
pub mod config;
pub mod dataset;
pub mod error;
pub mod forest;
pub mod inference;
pub mod intake;
pub mod metrics;
pub mod schema;
pub mod telemetry;
pub mod training;
