pub mod configuration;
pub mod domain;
pub mod store;
pub mod telemetry;
