//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - World API reads and writes (could swap HTTP for anything else)
//! - Gate control in the game world

mod api;
mod error;

pub use api::{
    DomainsQueryPort, EntityQueryPort, GateControlPort, HealthPort, UsersCommandPort,
    UsersQueryPort,
};
pub use error::{ApiError, ErrorDiagnostic, FaultKind, GateControlError, DIAGNOSTIC_SNIPPET_LIMIT};

#[cfg(test)]
pub use api::{
    MockDomainsQueryPort, MockGateControlPort, MockHealthPort, MockUsersCommandPort,
    MockUsersQueryPort,
};
