pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod metrics;
pub mod retry;
pub mod security;
pub mod server;
pub mod telemetry;
pub mod translation;
