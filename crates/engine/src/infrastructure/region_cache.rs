//! Entity cache with a secondary index on the external region id.

use std::hash::Hash;
use std::time::Duration;

use dashmap::DashMap;
use realmward_domain::common::non_blank;
use realmward_domain::{DistrictDetail, StructureDetail, TownDetail};

use super::cache::{CacheBackend, CacheMetrics, TtlCache};

/// Records bound to an external region.
pub trait RegionKeyed {
    /// `None` (or blank) when the record has no region.
    fn region_key(&self) -> Option<&str>;
}

impl RegionKeyed for TownDetail {
    fn region_key(&self) -> Option<&str> {
        non_blank(self.region_id.as_deref())
    }
}

impl RegionKeyed for DistrictDetail {
    fn region_key(&self) -> Option<&str> {
        non_blank(self.region_id.as_deref())
    }
}

impl RegionKeyed for StructureDetail {
    fn region_key(&self) -> Option<&str> {
        non_blank(self.region_id.as_deref())
    }
}

/// An id-keyed [`TtlCache`] that can also be searched by region id.
///
/// The index only points at ids; freshness is always decided by the
/// underlying entry, so an indexed region whose entry expired reads as absent.
pub struct RegionIndexedCache<K, V> {
    by_id: TtlCache<K, V>,
    region_to_id: DashMap<String, K>,
}

impl<K, V> RegionIndexedCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: RegionKeyed + Clone + Send + Sync,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            by_id: TtlCache::new(ttl),
            region_to_id: DashMap::new(),
        }
    }

    pub fn insert(&self, id: K, value: V) {
        if let Some(region) = value.region_key() {
            self.region_to_id.insert(region.to_string(), id.clone());
        }
        self.by_id.insert(id, value);
    }

    /// Batch insert under one timestamp; every regioned value is indexed.
    pub fn insert_all(&self, values: Vec<(K, V)>) {
        for (id, value) in &values {
            if let Some(region) = value.region_key() {
                self.region_to_id.insert(region.to_string(), id.clone());
            }
        }
        self.by_id.insert_all(values);
    }

    pub fn get(&self, id: &K) -> Option<V> {
        self.by_id.get(id)
    }

    /// Fresh entry bound to `region_id`, if any.
    pub fn get_by_region_id(&self, region_id: &str) -> Option<V> {
        let id = self.region_to_id.get(region_id).map(|entry| entry.value().clone())?;
        let value = self.by_id.get(&id)?;
        // The index can lag behind an entry whose region changed.
        (value.region_key() == Some(region_id)).then_some(value)
    }

    pub fn remove(&self, id: &K) -> Option<V> {
        let removed = self.by_id.remove(id)?;
        if let Some(region) = removed.region_key() {
            self.region_to_id.remove_if(region, |_, indexed| indexed == id);
        }
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn metrics(&self) -> &CacheMetrics {
        self.by_id.metrics()
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &TtlCache<K, V> {
        &self.by_id
    }
}

impl<K, V> CacheBackend<K, V> for RegionIndexedCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: RegionKeyed + Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        self.by_id.get(key)
    }

    fn get_stale(&self, key: &K) -> Option<V> {
        self.by_id.get_stale(key)
    }

    fn put(&self, key: K, value: V) {
        self.insert(key, value);
    }

    fn put_all(&self, entries: Vec<(K, V)>) {
        self.insert_all(entries);
    }

    fn invalidate(&self, key: &K) {
        self.remove(key);
    }

    fn clear(&self) {
        self.by_id.clear();
        self.region_to_id.clear();
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }
}
