//! Typed outcome of a single data-access call.

use std::fmt;

use crate::infrastructure::ports::{ApiError, ErrorDiagnostic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStatus {
    /// Served fresh from the cache.
    Hit,
    /// Fetched from the API and written to the cache.
    MissFetched,
    /// Neither the cache nor the API had a value.
    NotFound,
    /// The API failed and nothing could stand in for it.
    Error,
    /// An expired cache entry served in place of the API.
    StaleServed,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::MissFetched => "MISS_FETCHED",
            Self::NotFound => "NOT_FOUND",
            Self::Error => "ERROR",
            Self::StaleServed => "STALE_SERVED",
        }
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the value of a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    Cache,
    Api,
    Unknown,
}

/// Returned by [`FetchResult::into_required`] when there is no value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("No value present (status: {status})")]
pub struct MissingValue {
    pub status: FetchStatus,
    #[source]
    pub error: Option<ApiError>,
}

/// Outcome of a fetch.
///
/// Only the named constructors build one, so a value is present exactly for
/// `Hit`, `MissFetched` and `StaleServed`, and an error exactly for `Error`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult<V> {
    status: FetchStatus,
    value: Option<V>,
    error: Option<ApiError>,
    source: DataSource,
}

impl<V> FetchResult<V> {
    pub fn hit(value: V) -> Self {
        Self {
            status: FetchStatus::Hit,
            value: Some(value),
            error: None,
            source: DataSource::Cache,
        }
    }

    pub fn miss_fetched(value: V) -> Self {
        Self {
            status: FetchStatus::MissFetched,
            value: Some(value),
            error: None,
            source: DataSource::Api,
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: FetchStatus::NotFound,
            value: None,
            error: None,
            source: DataSource::Unknown,
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            status: FetchStatus::Error,
            value: None,
            error: Some(error),
            source: DataSource::Unknown,
        }
    }

    pub fn stale_served(value: V) -> Self {
        Self {
            status: FetchStatus::StaleServed,
            value: Some(value),
            error: None,
            source: DataSource::Cache,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<V> {
        self.value
    }

    pub fn error_ref(&self) -> Option<&ApiError> {
        self.error.as_ref()
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn is_stale(&self) -> bool {
        self.status == FetchStatus::StaleServed
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.status == FetchStatus::Error
    }

    /// Transform the value, keeping status, error and source.
    ///
    /// `f` is only called when a value is present.
    pub fn map<U, F>(self, f: F) -> FetchResult<U>
    where
        F: FnOnce(V) -> U,
    {
        FetchResult {
            status: self.status,
            value: self.value.map(f),
            error: self.error,
            source: self.source,
        }
    }

    pub fn into_required(self) -> Result<V, MissingValue> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(MissingValue {
                status: self.status,
                error: self.error,
            }),
        }
    }

    pub fn unwrap_or(self, default: V) -> V {
        self.value.unwrap_or(default)
    }

    /// Displayable summary of the error, for `Error` results.
    pub fn diagnostic(&self) -> Option<ErrorDiagnostic> {
        self.error.as_ref().map(ApiError::diagnostic)
    }
}

impl<V> fmt::Display for FetchResult<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FetchResult({}", self.status)?;
        if let Some(error) = &self.error {
            write!(f, ", error={error}")?;
        }
        write!(f, ")")
    }
}
