//! HTTP adapter for the world API.

mod client;
mod endpoints;

pub use client::{ApiAuth, HttpApiClient, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT};
