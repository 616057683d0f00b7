//! realmward engine - command-line region check.
//!
//! Usage: `realmward-engine [OLD_REGION,...] NEW_REGION...`
//!
//! Checks API health, warms the resolver for every region named, prints what
//! they resolve to and the decision for moving from the old set (first
//! argument, comma separated, may be empty) to the new one.

use std::sync::Arc;

use async_trait::async_trait;
use realmward_domain::{DomainId, PlayerId};
use realmward_engine::data_access::FetchStatus;
use realmward_engine::infrastructure::config::EngineConfig;
use realmward_engine::infrastructure::http::HttpApiClient;
use realmward_engine::infrastructure::ports::{GateControlError, GateControlPort};
use realmward_engine::infrastructure::telemetry::{init_tracing, DEFAULT_LOG_FILTER};
use realmward_engine::{ApiPorts, App};

/// Gate controller for runs without a game server: records what would happen.
struct LoggingGateControl;

#[async_trait]
impl GateControlPort for LoggingGateControl {
    async fn open_gate(&self, gate: DomainId, actor: PlayerId) -> Result<(), GateControlError> {
        tracing::info!(gate_id = %gate, actor = %actor, "Would open gate");
        Ok(())
    }

    async fn close_gate(&self, gate: DomainId, actor: PlayerId) -> Result<(), GateControlError> {
        tracing::info!(gate_id = %gate, actor = %actor, "Would close gate");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();
    init_tracing(DEFAULT_LOG_FILTER);

    let config = EngineConfig::from_env()?;
    tracing::info!(api = %config.api_base_url, "Starting realmward engine");

    let client = HttpApiClient::new(&config.api_base_url, config.request_timeout)
        .with_auth(config.api_auth.clone());
    let app = App::new(config, ApiPorts::http(client), Some(Arc::new(LoggingGateControl)));

    let health = app.entities.health.refresh().await;
    match (health.status(), health.value()) {
        (FetchStatus::MissFetched, Some(status)) => tracing::info!(
            status = status.status(),
            version = status.version().unwrap_or("unknown"),
            "API reachable"
        ),
        _ => {
            if let Some(diagnostic) = health.diagnostic() {
                tracing::warn!(%diagnostic, "API health check failed");
            } else {
                tracing::warn!(status = %health.status(), "API health check returned nothing");
            }
        }
    }

    let mut args = std::env::args().skip(1);
    let old_regions: Vec<String> = args
        .next()
        .map(|first| split_regions(&first))
        .unwrap_or_default();
    let new_regions: Vec<String> = args.collect();
    if old_regions.is_empty() && new_regions.is_empty() {
        println!("usage: realmward-engine [OLD_REGION,...] NEW_REGION...");
        return Ok(());
    }

    let resolver = app.resolver();
    resolver
        .warm_cache(old_regions.iter().chain(new_regions.iter()))
        .await;

    for domain in resolver.resolve_regions(&new_regions).domains() {
        println!(
            "{} -> {} #{} ({})",
            domain.region_id, domain.domain_type, domain.id, domain.name
        );
    }

    let decision = app
        .transitions()
        .handle_region_transition(PlayerId::new(), &old_regions, &new_regions)
        .await;
    println!(
        "{:?} allowed={} {}",
        decision.transition(),
        decision.movement_allowed(),
        decision.message().unwrap_or_default()
    );

    tracing::info!(metrics = %resolver.domain_cache_metrics(), "Resolver cache");
    Ok(())
}

fn split_regions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
