//! Infrastructure implementations.
//!
//! Caches, retry, port traits and their HTTP adapter, configuration and
//! tracing setup.

pub mod cache;
pub mod config;
pub mod http;
pub mod ports;
pub mod region_cache;
pub mod retry;
pub mod telemetry;
