//! Strategies for combining cache and remote reads.

use std::fmt;
use std::str::FromStr;

use realmward_domain::DomainError;
use serde::{Deserialize, Serialize};

/// How a single retrieval combines the cache and the world API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchPolicy {
    /// Cache only; never calls the API.
    CacheOnly,
    /// Cache, then the API on a miss.
    #[default]
    CacheFirst,
    /// Always the API; successful reads are still written to the cache.
    ApiOnly,
    /// The API first, falling back to the cache when it has nothing or fails.
    ApiThenCacheRefresh,
    /// Like `CacheFirst`, but an expired entry may be served when the API
    /// has nothing or fails.
    StaleOk,
}

impl FetchPolicy {
    pub const ALL: [FetchPolicy; 5] = [
        FetchPolicy::CacheOnly,
        FetchPolicy::CacheFirst,
        FetchPolicy::ApiOnly,
        FetchPolicy::ApiThenCacheRefresh,
        FetchPolicy::StaleOk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CacheOnly => "CACHE_ONLY",
            Self::CacheFirst => "CACHE_FIRST",
            Self::ApiOnly => "API_ONLY",
            Self::ApiThenCacheRefresh => "API_THEN_CACHE_REFRESH",
            Self::StaleOk => "STALE_OK",
        }
    }

    /// Whether this policy may call the API at all.
    pub fn may_call_api(&self) -> bool {
        !matches!(self, Self::CacheOnly)
    }
}

impl fmt::Display for FetchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchPolicy {
    type Err = DomainError;

    /// Accepts any case with `_` or `-` separators (`cache-first`, `STALE_OK`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown fetch policy: {s}")))
    }
}
