//! Per-entity data-access configuration.

use crate::infrastructure::retry::RetryPolicy;

use super::FetchPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct DataAccessSettings {
    default_policy: FetchPolicy,
    allow_stale: bool,
    retry_policy: RetryPolicy,
}

impl Default for DataAccessSettings {
    fn default() -> Self {
        Self {
            default_policy: FetchPolicy::CacheFirst,
            allow_stale: true,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl DataAccessSettings {
    pub fn new(default_policy: FetchPolicy, allow_stale: bool, retry_policy: RetryPolicy) -> Self {
        Self {
            default_policy,
            allow_stale,
            retry_policy,
        }
    }

    pub fn with_default_policy(mut self, policy: FetchPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    pub fn with_allow_stale(mut self, allow_stale: bool) -> Self {
        self.allow_stale = allow_stale;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn default_policy(&self) -> FetchPolicy {
        self.default_policy
    }

    pub fn allow_stale(&self) -> bool {
        self.allow_stale
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Effective policy for a call. `StaleOk` degrades to `CacheFirst` when
    /// stale reads are disabled, whether requested or defaulted.
    pub fn resolve_policy(&self, requested: Option<FetchPolicy>) -> FetchPolicy {
        match requested.unwrap_or(self.default_policy) {
            FetchPolicy::StaleOk if !self.allow_stale => FetchPolicy::CacheFirst,
            effective => effective,
        }
    }
}
