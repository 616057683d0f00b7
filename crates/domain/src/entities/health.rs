//! API health status.

use serde::{Deserialize, Serialize};

use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHealthStatus")]
pub struct HealthStatus {
    status: String,
    version: Option<String>,
}

#[derive(Deserialize)]
struct RawHealthStatus {
    status: String,
    version: Option<String>,
}

impl TryFrom<RawHealthStatus> for HealthStatus {
    type Error = DomainError;

    fn try_from(raw: RawHealthStatus) -> Result<Self, Self::Error> {
        Self::new(raw.status, raw.version)
    }
}

impl HealthStatus {
    pub fn new(status: impl Into<String>, version: Option<String>) -> Result<Self, DomainError> {
        let status = status.into();
        if status.trim().is_empty() {
            return Err(DomainError::validation("health status cannot be blank"));
        }
        Ok(Self { status, version })
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("up") || self.status.eq_ignore_ascii_case("ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_status_is_rejected() {
        assert!(HealthStatus::new("  ", None).is_err());
        assert!(serde_json::from_str::<HealthStatus>(r#"{"status":""}"#).is_err());
    }

    #[test]
    fn up_and_ok_are_healthy_in_any_case() {
        assert!(HealthStatus::new("UP", None).expect("valid").is_healthy());
        assert!(HealthStatus::new("ok", Some("1.2".into())).expect("valid").is_healthy());
        assert!(!HealthStatus::new("DEGRADED", None).expect("valid").is_healthy());
    }
}
