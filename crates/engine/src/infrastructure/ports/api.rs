//! World API port traits.
//!
//! One query port per entity family, plus the users command port. The HTTP
//! adapter in `infrastructure::http` implements all of them; tests use
//! mockall mocks or small in-memory fakes.

use std::collections::HashMap;

use async_trait::async_trait;
use realmward_domain::{
    DomainId, DomainRegionQuery, DomainRegionSummary, HealthStatus, Page, PagedQuery, PlayerId,
    UserDetail, UserSummary,
};

use super::error::{ApiError, GateControlError};

// =============================================================================
// Entity queries
// =============================================================================

/// Read side of one entity family keyed by `K`.
///
/// `get_by_id` yields `Ok(None)` when the API has no such record; a missing
/// record is an outcome, not an error.
#[async_trait]
pub trait EntityQueryPort<K, V>: Send + Sync
where
    K: Send + 'static,
    V: Send + 'static,
{
    async fn get_by_id(&self, id: K) -> Result<Option<V>, ApiError>;
    async fn search(&self, query: &PagedQuery) -> Result<Page<V>, ApiError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DomainsQueryPort: Send + Sync {
    async fn get_by_region_id(
        &self,
        region_id: &str,
    ) -> Result<Option<DomainRegionSummary>, ApiError>;

    /// Batched region-to-domain lookup keyed by domain id.
    async fn search_region_decisions(
        &self,
        query: &DomainRegionQuery,
    ) -> Result<HashMap<DomainId, DomainRegionSummary>, ApiError>;
}

// =============================================================================
// Users
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQueryPort: Send + Sync {
    async fn get_by_uuid(&self, uuid: PlayerId) -> Result<Option<UserSummary>, ApiError>;
    async fn get_by_username(&self, username: &str) -> Result<Option<UserSummary>, ApiError>;
    async fn search(&self, query: &PagedQuery) -> Result<Page<UserSummary>, ApiError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommandPort: Send + Sync {
    async fn create(&self, seed: &UserDetail) -> Result<Option<UserDetail>, ApiError>;
}

// =============================================================================
// Health
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthPort: Send + Sync {
    async fn get_health(&self) -> Result<Option<HealthStatus>, ApiError>;
}

// =============================================================================
// Gates
// =============================================================================

/// Opens and closes physical gate structures in the world.
///
/// Callers treat both operations as best-effort side effects.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GateControlPort: Send + Sync {
    async fn open_gate(&self, gate: DomainId, actor: PlayerId) -> Result<(), GateControlError>;
    async fn close_gate(&self, gate: DomainId, actor: PlayerId) -> Result<(), GateControlError>;
}
