//! realmward engine library.
//!
//! Cache/API orchestration for the world API and the region transition
//! engine built on top of it.
//!
//! ## Structure
//!
//! - `data_access/` - Fetch policies, results and the policy executor
//! - `entities/` - Per-entity gateways over the executor
//! - `use_cases/` - Region resolution and transition decisions
//! - `infrastructure/` - Caches, retry, ports, HTTP adapter, config, tracing
//! - `app` - Application composition

pub mod app;
pub mod data_access;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

pub use app::{ApiPorts, App};
