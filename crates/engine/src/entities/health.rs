//! World API health checks, cached under a single key.

use std::sync::Arc;

use realmward_domain::HealthStatus;

use crate::data_access::{DataAccessExecutor, DataAccessSettings, FetchPolicy, FetchResult};
use crate::infrastructure::cache::{CacheBackend, TtlCache};
use crate::infrastructure::ports::HealthPort;

pub const HEALTH_KEY: &str = "api-health";

pub type HealthCache = TtlCache<&'static str, HealthStatus>;

pub struct Health {
    executor: DataAccessExecutor<&'static str, HealthStatus>,
    port: Arc<dyn HealthPort>,
    settings: DataAccessSettings,
}

impl Health {
    pub const ENTITY: &'static str = "health";

    pub fn new(
        cache: Arc<HealthCache>,
        port: Arc<dyn HealthPort>,
        settings: DataAccessSettings,
    ) -> Self {
        let backend: Arc<dyn CacheBackend<&'static str, HealthStatus>> = cache;
        Self {
            executor: DataAccessExecutor::new(
                backend,
                settings.retry_policy().clone(),
                Self::ENTITY,
            ),
            port,
            settings,
        }
    }

    pub async fn get_health(&self, policy: Option<FetchPolicy>) -> FetchResult<HealthStatus> {
        let policy = self.settings.resolve_policy(policy);
        self.executor
            .fetch(&HEALTH_KEY, policy, || {
                let port = Arc::clone(&self.port);
                async move { port.get_health().await }
            })
            .await
    }

    pub async fn refresh(&self) -> FetchResult<HealthStatus> {
        self.get_health(Some(FetchPolicy::ApiOnly)).await
    }

    pub fn invalidate(&self) {
        self.executor.invalidate(&HEALTH_KEY);
    }
}
