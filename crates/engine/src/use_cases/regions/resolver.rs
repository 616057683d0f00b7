//! Maps external region ids to the domains they belong to.
//!
//! Lookups try the shared town, district and structure caches first (in that
//! order), then a short-lived local snapshot map filled from the domains
//! search endpoint. Nothing here blocks: the only remote call is the batched
//! search in [`RegionDomainResolver::resolve_regions_from_api`] and
//! [`RegionDomainResolver::warm_cache`].

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use realmward_domain::common::non_blank;
use realmward_domain::{
    DistrictDetail, DomainId, DomainRegionQuery, DomainRegionSummary, DomainSnapshot, DomainType,
    RegionSnapshot, StructureDetail, TownDetail,
};

use crate::entities::{DistrictCache, StructureCache, TownCache};
use crate::infrastructure::cache::{CacheLookup, CacheMetricsSnapshot, TtlCache};
use crate::infrastructure::ports::DomainsQueryPort;

/// How long a snapshot registered from the search endpoint stays usable.
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(60);

const UNKNOWN_DOMAIN_TYPE: &str = "unknown";

pub struct RegionDomainResolver {
    towns: Option<Arc<TownCache>>,
    districts: Option<Arc<DistrictCache>>,
    structures: Option<Arc<StructureCache>>,
    domains_api: Option<Arc<dyn DomainsQueryPort>>,
    snapshots: TtlCache<String, DomainSnapshot>,
}

impl Default for RegionDomainResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionDomainResolver {
    /// Resolver backed only by its local snapshot map.
    pub fn new() -> Self {
        Self {
            towns: None,
            districts: None,
            structures: None,
            domains_api: None,
            snapshots: TtlCache::new(DEFAULT_SNAPSHOT_TTL),
        }
    }

    pub fn with_shared_caches(
        mut self,
        towns: Arc<TownCache>,
        districts: Arc<DistrictCache>,
        structures: Arc<StructureCache>,
    ) -> Self {
        self.towns = Some(towns);
        self.districts = Some(districts);
        self.structures = Some(structures);
        self
    }

    pub fn with_domains_api(mut self, api: Arc<dyn DomainsQueryPort>) -> Self {
        self.domains_api = Some(api);
        self
    }

    pub fn with_snapshot_ttl(mut self, ttl: Duration) -> Self {
        self.snapshots = TtlCache::new(ttl);
        self
    }

    /// Resolve from caches only.
    pub fn resolve_regions<I, S>(&self, region_ids: I) -> RegionSnapshot
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        RegionSnapshot::from_domains(
            region_ids
                .into_iter()
                .filter_map(|id| self.get_domain_by_region_id(id.as_ref())),
        )
    }

    /// Resolve, fetching regions missing from every cache with one batched
    /// search first.
    ///
    /// A failed search is logged and the cache-only result returned.
    pub async fn resolve_regions_from_api<I, S>(&self, region_ids: I) -> RegionSnapshot
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: BTreeSet<String> = region_ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        if requested.is_empty() {
            return RegionSnapshot::empty();
        }

        let Some(api) = &self.domains_api else {
            tracing::debug!("No domains API configured; resolving from cache only");
            return self.resolve_regions(&requested);
        };

        let missing = self.missing_regions(&requested);
        if missing.is_empty() {
            return self.resolve_regions(&requested);
        }

        self.fetch_and_register(api.as_ref(), missing).await;
        let snapshot = self.resolve_regions(&requested);
        tracing::info!(
            requested = requested.len(),
            domains = snapshot.len(),
            "Resolved regions from API"
        );
        snapshot
    }

    /// Preload regions that are not cached yet. Failures are logged only.
    pub async fn warm_cache<I, S>(&self, region_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requested: BTreeSet<String> = region_ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        let missing = self.missing_regions(&requested);
        if missing.is_empty() {
            tracing::debug!("warm_cache: all regions already cached");
            return;
        }
        let Some(api) = &self.domains_api else {
            tracing::warn!(missing = missing.len(), "warm_cache: no domains API configured");
            return;
        };
        let registered = self.fetch_and_register(api.as_ref(), missing).await;
        tracing::info!(registered, "warm_cache completed");
    }

    /// Fresh domain for a region, recording a hit, miss or stale hit.
    ///
    /// An expired local snapshot reads as absent.
    pub fn get_domain_by_region_id(&self, region_id: &str) -> Option<DomainSnapshot> {
        let metrics = self.snapshots.metrics();
        if let Some(domain) = self.check_shared_caches(region_id) {
            tracing::debug!(region_id, domain = %domain.name, "Domain cache HIT (shared)");
            metrics.record_hit();
            return Some(domain);
        }

        match self.snapshots.lookup(&region_id.to_string()) {
            CacheLookup::Fresh(domain) => {
                tracing::debug!(region_id, domain = %domain.name, "Domain cache HIT");
                metrics.record_hit();
                Some(domain)
            }
            CacheLookup::Expired(domain) => {
                tracing::debug!(region_id, domain = %domain.name, "Domain cache STALE");
                metrics.record_stale_hit();
                None
            }
            CacheLookup::Absent => {
                tracing::debug!(region_id, "Domain cache MISS");
                metrics.record_miss();
                None
            }
        }
    }

    /// Like [`Self::get_domain_by_region_id`], but an expired local snapshot
    /// is still returned and counted as a hit.
    pub fn peek_domain_by_region_id(&self, region_id: &str) -> Option<DomainSnapshot> {
        let metrics = self.snapshots.metrics();
        let found = self.check_shared_caches(region_id).or_else(|| {
            match self.snapshots.lookup(&region_id.to_string()) {
                CacheLookup::Fresh(domain) | CacheLookup::Expired(domain) => Some(domain),
                CacheLookup::Absent => None,
            }
        });
        match &found {
            Some(_) => metrics.record_hit(),
            None => metrics.record_miss(),
        }
        found
    }

    /// Store a snapshot in the local map. Snapshots without a region are
    /// ignored.
    pub fn register_domain(&self, domain: DomainSnapshot) {
        let Some(region) = non_blank(Some(&domain.region_id)).map(str::to_string) else {
            return;
        };
        self.snapshots.insert(region, domain);
    }

    pub fn domain_cache_metrics(&self) -> CacheMetricsSnapshot {
        self.snapshots.metrics().snapshot()
    }

    pub fn domain_cache_len(&self) -> usize {
        self.snapshots.len()
    }

    /// Drop expired local snapshots. Runs before every domain search.
    pub fn cleanup_expired(&self) -> usize {
        let removed = self.snapshots.cleanup_expired();
        if removed > 0 {
            tracing::debug!(removed, "Evicted expired domain snapshots");
        }
        removed
    }

    fn missing_regions(&self, requested: &BTreeSet<String>) -> BTreeSet<String> {
        requested
            .iter()
            .filter(|id| self.get_domain_by_region_id(id).is_none())
            .cloned()
            .collect()
    }

    /// One search for `missing`; returns how many snapshots were registered.
    async fn fetch_and_register(
        &self,
        api: &dyn DomainsQueryPort,
        missing: BTreeSet<String>,
    ) -> usize {
        self.cleanup_expired();
        let query = DomainRegionQuery::with_hierarchy(missing);
        match api.search_region_decisions(&query).await {
            Ok(found) => {
                let mut roots: Vec<(DomainId, DomainRegionSummary)> = found.into_iter().collect();
                roots.sort_by_key(|(id, _)| *id);
                self.register_hierarchies(roots.into_iter().map(|(_, summary)| summary))
            }
            Err(e) => {
                tracing::warn!(
                    regions = ?query.region_ids,
                    error = %e,
                    "Domain search failed; using cached domains only"
                );
                0
            }
        }
    }

    /// Walk every summary and its parent chain depth-first, registering each
    /// node once per region id.
    fn register_hierarchies(&self, roots: impl Iterator<Item = DomainRegionSummary>) -> usize {
        let mut stack: Vec<DomainRegionSummary> = roots.collect();
        stack.reverse();
        let mut visited: HashSet<String> = HashSet::new();
        let mut collected: Vec<DomainSnapshot> = Vec::new();

        while let Some(mut summary) = stack.pop() {
            let region = non_blank(summary.region_id.as_deref()).map(str::to_string);
            if let Some(region) = &region {
                if !visited.insert(region.clone()) {
                    continue;
                }
            }

            let parents = std::mem::take(&mut summary.parents);
            if let Some(snapshot) = snapshot_from_summary(&summary, region, &parents) {
                collected.push(snapshot);
            }
            stack.extend(parents.into_iter().rev());
        }

        // Child links are only known once the whole batch has been walked.
        let mut children: BTreeMap<DomainId, BTreeSet<DomainId>> = BTreeMap::new();
        for snapshot in &collected {
            for parent in &snapshot.parent_ids {
                children.entry(*parent).or_default().insert(snapshot.id);
            }
        }

        let registered = collected.len();
        for mut snapshot in collected {
            if let Some(child_ids) = children.get(&snapshot.id) {
                snapshot.child_ids.extend(child_ids.iter().copied());
            }
            self.register_domain(snapshot);
        }
        registered
    }

    fn check_shared_caches(&self, region_id: &str) -> Option<DomainSnapshot> {
        if let Some(town) = self.towns.as_ref().and_then(|c| c.get_by_region_id(region_id)) {
            return Some(town_snapshot(town, region_id));
        }
        if let Some(district) = self
            .districts
            .as_ref()
            .and_then(|c| c.get_by_region_id(region_id))
        {
            return Some(district_snapshot(district, region_id));
        }
        self.structures
            .as_ref()
            .and_then(|c| c.get_by_region_id(region_id))
            .map(|structure| structure_snapshot(structure, region_id))
    }
}

/// `None` when the summary carries no id or no region.
fn snapshot_from_summary(
    summary: &DomainRegionSummary,
    region: Option<String>,
    parents: &[DomainRegionSummary],
) -> Option<DomainSnapshot> {
    let (Some(id), Some(region)) = (summary.id, region) else {
        tracing::debug!(name = %summary.name, "Skipping domain without id or region");
        return None;
    };
    let domain_type =
        DomainType::from_tag(summary.domain_type.as_deref().unwrap_or(UNKNOWN_DOMAIN_TYPE));

    let mut snapshot = DomainSnapshot::new(id, summary.name.clone(), region, domain_type)
        .with_description(summary.description.clone())
        .with_policy(summary.allow_entry, summary.allow_exit);
    for parent in parents {
        if let Some(parent_id) = parent.id {
            snapshot = snapshot.with_parent(parent_id, Some(parent.name.clone()));
        }
    }
    Some(snapshot)
}

fn town_snapshot(town: TownDetail, region_id: &str) -> DomainSnapshot {
    DomainSnapshot::new(DomainId::new(town.id.get()), town.name, region_id, DomainType::Town)
        .with_description(town.description)
        .with_policy(town.allow_entry, town.allow_exit)
}

fn district_snapshot(district: DistrictDetail, region_id: &str) -> DomainSnapshot {
    let parent = district.town_id.or(district.town.as_ref().map(|t| t.id));
    let parent_name = district.town.as_ref().map(|t| t.name.clone());
    let snapshot = DomainSnapshot::new(
        DomainId::new(district.id.get()),
        district.name,
        region_id,
        DomainType::District,
    )
    .with_description(district.description)
    .with_policy(district.allow_entry, district.allow_exit);

    match parent {
        Some(town_id) => snapshot.with_parent(DomainId::new(town_id.get()), parent_name),
        None => snapshot,
    }
}

fn structure_snapshot(structure: StructureDetail, region_id: &str) -> DomainSnapshot {
    let snapshot = DomainSnapshot::new(
        DomainId::new(structure.id.get()),
        structure.name,
        region_id,
        DomainType::Structure,
    )
    .with_description(structure.description)
    .with_policy(structure.allow_entry, structure.allow_exit);

    match structure.district_id {
        Some(district_id) => snapshot.with_parent(DomainId::new(district_id.get()), None),
        None => snapshot,
    }
}
