//! Error types for port operations.

use realmward_domain::common::truncate_chars;

/// Longest response body fragment carried into a diagnostic.
pub const DIAGNOSTIC_SNIPPET_LIMIT: usize = 200;

/// Whether a remote fault is worth retrying.
///
/// Decided once, where the fault is created, so retry code never has to
/// inspect error internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Timeout or connection failure.
    Transient,
    /// Anything else: business errors, malformed responses, bad requests.
    Permanent,
}

/// Remote API failures with enough context for an actionable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The API could not be reached.
    #[error("Could not connect to {url}: {message}")]
    Connection { url: String, message: String },

    /// The API answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body was not the expected shape.
    #[error("Could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// The request could not be built or sent for a non-network reason.
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// No API is wired for this operation.
    #[error("World API unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    pub fn connection(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn decode(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn request(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Request {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn fault_kind(&self) -> FaultKind {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => FaultKind::Transient,
            Self::Status { .. }
            | Self::Decode { .. }
            | Self::Request { .. }
            | Self::Unavailable(_) => FaultKind::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.fault_kind() == FaultKind::Transient
    }

    /// Upstream URL, when the failure came from a request.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Timeout { url }
            | Self::Connection { url, .. }
            | Self::Status { url, .. }
            | Self::Decode { url, .. }
            | Self::Request { url, .. } => Some(url),
            Self::Unavailable(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Bounded form suitable for showing to a player or an operator.
    pub fn diagnostic(&self) -> ErrorDiagnostic {
        let detail = match self {
            Self::Status { body, .. } if !body.trim().is_empty() => body.trim().to_string(),
            other => other.to_string(),
        };
        ErrorDiagnostic {
            status_code: self.status_code(),
            snippet: truncate_chars(&detail, DIAGNOSTIC_SNIPPET_LIMIT),
            url: self.url().map(str::to_string),
        }
    }
}

/// Safe-to-display summary of an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDiagnostic {
    pub status_code: Option<u16>,
    pub snippet: String,
    pub url: Option<String>,
}

impl std::fmt::Display for ErrorDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "HTTP {code}: {}", self.snippet)?,
            None => write!(f, "{}", self.snippet)?,
        }
        if let Some(url) = &self.url {
            write!(f, " ({url})")?;
        }
        Ok(())
    }
}

/// Failure reported by a gate controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateControlError {
    #[error("Gate {0} is not known to the controller")]
    UnknownGate(String),

    #[error("Gate operation failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_faults_are_transient() {
        assert!(ApiError::timeout("http://api/towns/1").is_transient());
        assert!(ApiError::connection("http://api", "refused").is_transient());
        assert!(!ApiError::status("http://api", 400, "bad").is_transient());
        assert!(!ApiError::decode("http://api", "eof").is_transient());
        assert!(!ApiError::unavailable("no client").is_transient());
    }

    #[test]
    fn diagnostic_truncates_body_and_keeps_url() {
        let body = "x".repeat(500);
        let diagnostic = ApiError::status("http://api/users", 422, body).diagnostic();

        assert_eq!(diagnostic.status_code, Some(422));
        assert_eq!(diagnostic.url.as_deref(), Some("http://api/users"));
        assert!(diagnostic.snippet.chars().count() <= DIAGNOSTIC_SNIPPET_LIMIT + 3);
        assert!(diagnostic.snippet.ends_with("..."));
    }

    #[test]
    fn diagnostic_falls_back_to_error_text() {
        let diagnostic = ApiError::timeout("http://api/towns/3").diagnostic();
        assert_eq!(diagnostic.status_code, None);
        assert_eq!(diagnostic.snippet, "Request to http://api/towns/3 timed out");
        assert_eq!(
            diagnostic.to_string(),
            "Request to http://api/towns/3 timed out (http://api/towns/3)"
        );
    }
}
