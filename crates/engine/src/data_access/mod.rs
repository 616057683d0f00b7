//! Cache-aware access to the world API.
//!
//! [`DataAccessExecutor`] runs one of five [`FetchPolicy`] strategies for a
//! key and reports the outcome as a [`FetchResult`]. Gateways in
//! `crate::entities` bind an executor to one entity type.

mod executor;
mod fetch_policy;
mod fetch_result;
mod settings;

pub use executor::DataAccessExecutor;
pub use fetch_policy::FetchPolicy;
pub use fetch_result::{DataSource, FetchResult, FetchStatus, MissingValue};
pub use settings::DataAccessSettings;
