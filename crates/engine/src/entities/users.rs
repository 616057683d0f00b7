//! Player account access.
//!
//! Accounts are cached by player uuid. Username lookups always go to the API
//! and then populate the uuid cache.

use std::sync::Arc;

use realmward_domain::{Page, PagedQuery, PlayerId, UserDetail, UserSummary};

use crate::data_access::{
    DataAccessExecutor, DataAccessSettings, FetchPolicy, FetchResult, FetchStatus,
};
use crate::infrastructure::cache::{CacheBackend, TtlCache};
use crate::infrastructure::ports::{ApiError, UsersCommandPort, UsersQueryPort};

pub type UserCache = TtlCache<PlayerId, UserSummary>;

pub struct Users {
    executor: DataAccessExecutor<PlayerId, UserSummary>,
    query: Arc<dyn UsersQueryPort>,
    command: Option<Arc<dyn UsersCommandPort>>,
    settings: DataAccessSettings,
}

impl Users {
    pub const ENTITY: &'static str = "users";

    pub fn new(
        cache: Arc<UserCache>,
        query: Arc<dyn UsersQueryPort>,
        command: Option<Arc<dyn UsersCommandPort>>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<PlayerId, UserSummary>> = cache;
        Self {
            executor: DataAccessExecutor::new(
                backend,
                settings.retry_policy().clone(),
                Self::ENTITY,
            ),
            query,
            command,
            settings,
        }
    }

    pub async fn get_by_uuid(
        &self,
        uuid: PlayerId,
        policy: Option<FetchPolicy>,
    ) -> FetchResult<UserSummary> {
        let policy = self.settings.resolve_policy(policy);
        self.executor
            .fetch(&uuid, policy, || {
                let query = Arc::clone(&self.query);
                async move { query.get_by_uuid(uuid).await }
            })
            .await
    }

    pub async fn get(&self, uuid: PlayerId) -> FetchResult<UserSummary> {
        self.get_by_uuid(uuid, None).await
    }

    pub async fn refresh(&self, uuid: PlayerId) -> FetchResult<UserSummary> {
        self.get_by_uuid(uuid, Some(FetchPolicy::ApiOnly)).await
    }

    /// Always asks the API; a found account is cached under its uuid.
    ///
    /// Not retried: a failure is reported as `Error` straight away.
    pub async fn get_by_username(&self, username: &str) -> FetchResult<UserSummary> {
        match self.query.get_by_username(username).await {
            Ok(Some(user)) => {
                self.executor.prime(user.uuid, user.clone());
                FetchResult::miss_fetched(user)
            }
            Ok(None) => FetchResult::not_found(),
            Err(e) => {
                tracing::warn!(
                    entity = Self::ENTITY,
                    username,
                    error = %e,
                    "Username lookup failed"
                );
                FetchResult::error(e)
            }
        }
    }

    /// Resolve an account, creating it from `seed` when the API has none.
    ///
    /// Creation only happens for a `NotFound` lookup and when a seed is
    /// given. A failed creation is reported as `Error`; the lookup is not
    /// repeated.
    pub async fn get_or_create(
        &self,
        uuid: PlayerId,
        seed: Option<&UserDetail>,
    ) -> FetchResult<UserSummary> {
        let found = self.get(uuid).await;
        if found.has_value() {
            return found;
        }
        let seed = match seed {
            Some(seed) if found.status() == FetchStatus::NotFound => seed,
            _ => return found,
        };
        let Some(command) = &self.command else {
            return FetchResult::error(ApiError::unavailable("user creation is not configured"));
        };

        tracing::info!(entity = Self::ENTITY, uuid = %uuid, "Creating new user");
        match command.create(seed).await {
            Ok(Some(created)) => {
                let summary = UserSummary::from_created(created, uuid);
                self.executor.prime(summary.uuid, summary.clone());
                FetchResult::miss_fetched(summary)
            }
            Ok(None) => FetchResult::not_found(),
            Err(e) => {
                tracing::warn!(
                    entity = Self::ENTITY,
                    uuid = %uuid,
                    error = %e,
                    "Failed to create user"
                );
                FetchResult::error(e)
            }
        }
    }

    /// Search accounts; every returned account is cached.
    pub async fn search(&self, query: &PagedQuery) -> Result<Page<UserSummary>, ApiError> {
        let page = self.query.search(query).await?;
        self.executor
            .prime_all(page.items.iter().map(|user| (user.uuid, user.clone())).collect());
        Ok(page)
    }

    pub fn invalidate(&self, uuid: PlayerId) {
        self.executor.invalidate(&uuid);
    }

    pub fn invalidate_all(&self) {
        self.executor.invalidate_all();
    }
}
