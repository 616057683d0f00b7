//! Engine configuration from the environment.
//!
//! Every value has a default; only malformed values are errors.
//!
//! | Variable | Default |
//! |---|---|
//! | `REALMWARD_API_URL` | `http://localhost:5000/api` |
//! | `REALMWARD_API_TIMEOUT_SECS` | `10` |
//! | `REALMWARD_API_TOKEN` | unset (bearer auth) |
//! | `REALMWARD_API_KEY` | unset (`X-API-Key` auth) |
//! | `REALMWARD_CACHE_TTL_SECS` | `900` |
//! | `REALMWARD_DOMAIN_CACHE_TTL_SECS` | `60` |
//! | `REALMWARD_USER_CACHE_TTL_SECS` | `300` |
//! | `REALMWARD_FETCH_POLICY` | `CACHE_FIRST` |
//! | `REALMWARD_ALLOW_STALE` | `true` |
//! | `REALMWARD_RETRY_MAX_ATTEMPTS` | `3` |
//! | `REALMWARD_RETRY_INITIAL_DELAY_MS` | `100` |
//! | `REALMWARD_RETRY_MULTIPLIER` | `2.0` |
//! | `REALMWARD_RETRY_MAX_DELAY_MS` | `5000` |

use std::str::FromStr;
use std::time::Duration;

use crate::data_access::{DataAccessSettings, FetchPolicy};
use crate::infrastructure::http::{ApiAuth, DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT};
use crate::infrastructure::retry::{RetryPolicy, RetryPolicyError};

pub const DEFAULT_ENTITY_CACHE_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_DOMAIN_CACHE_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_USER_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid retry settings: {0}")]
    Retry(#[from] RetryPolicyError),
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub api_auth: ApiAuth,
    /// TTL for towns, districts, structures and the item catalogue.
    pub entity_cache_ttl: Duration,
    pub domain_cache_ttl: Duration,
    pub user_cache_ttl: Duration,
    pub data_access: DataAccessSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: DEFAULT_API_TIMEOUT,
            api_auth: ApiAuth::None,
            entity_cache_ttl: DEFAULT_ENTITY_CACHE_TTL,
            domain_cache_ttl: DEFAULT_DOMAIN_CACHE_TTL,
            user_cache_ttl: DEFAULT_USER_CACHE_TTL,
            data_access: DataAccessSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        let retry_defaults = RetryPolicy::default();

        let api_base_url = read("REALMWARD_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let api_auth = match (read("REALMWARD_API_TOKEN"), read("REALMWARD_API_KEY")) {
            (Some(token), _) => ApiAuth::Bearer(token.trim().to_string()),
            (None, Some(key)) => ApiAuth::api_key(key.trim()),
            (None, None) => ApiAuth::None,
        };

        let retry_policy = RetryPolicy::builder()
            .max_attempts(
                parse(&read, "REALMWARD_RETRY_MAX_ATTEMPTS")?
                    .unwrap_or(retry_defaults.max_attempts()),
            )
            .initial_delay(
                millis(&read, "REALMWARD_RETRY_INITIAL_DELAY_MS")?
                    .unwrap_or(retry_defaults.initial_delay()),
            )
            .backoff_multiplier(
                parse(&read, "REALMWARD_RETRY_MULTIPLIER")?
                    .unwrap_or(retry_defaults.backoff_multiplier()),
            )
            .max_delay(
                millis(&read, "REALMWARD_RETRY_MAX_DELAY_MS")?
                    .unwrap_or(retry_defaults.max_delay()),
            )
            .build()?;

        let default_policy = match read("REALMWARD_FETCH_POLICY") {
            Some(raw) => FetchPolicy::from_str(&raw)
                .map_err(|e| ConfigError::invalid("REALMWARD_FETCH_POLICY", &raw, e))?,
            None => defaults.data_access.default_policy(),
        };
        let allow_stale = match read("REALMWARD_ALLOW_STALE") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::invalid("REALMWARD_ALLOW_STALE", &raw, "expected a boolean")
            })?,
            None => defaults.data_access.allow_stale(),
        };

        Ok(Self {
            api_base_url,
            request_timeout: secs(&read, "REALMWARD_API_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout),
            api_auth,
            entity_cache_ttl: secs(&read, "REALMWARD_CACHE_TTL_SECS")?
                .unwrap_or(defaults.entity_cache_ttl),
            domain_cache_ttl: secs(&read, "REALMWARD_DOMAIN_CACHE_TTL_SECS")?
                .unwrap_or(defaults.domain_cache_ttl),
            user_cache_ttl: secs(&read, "REALMWARD_USER_CACHE_TTL_SECS")?
                .unwrap_or(defaults.user_cache_ttl),
            data_access: DataAccessSettings::new(default_policy, allow_stale, retry_policy),
        })
    }
}

fn parse<T, R>(read: &R, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    R: Fn(&str) -> Option<String>,
{
    read(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::invalid(key, &raw, e))
        })
        .transpose()
}

fn secs<R>(read: &R, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    R: Fn(&str) -> Option<String>,
{
    Ok(parse::<u64, _>(read, key)?.map(Duration::from_secs))
}

fn millis<R>(read: &R, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    R: Fn(&str) -> Option<String>,
{
    Ok(parse::<u64, _>(read, key)?.map(Duration::from_millis))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
