pub mod api;
pub mod client;
pub mod config;
pub mod handler;
pub mod host;
pub mod telemetry;
