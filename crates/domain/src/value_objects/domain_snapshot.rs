//! Flattened, immutable views of the domains enclosing a point in the world.
//!
//! A [`DomainSnapshot`] is taken at resolution time and never updated; the
//! canonical state lives in the entity caches. Parent and child links are ids,
//! not references, so a snapshot can never form a cycle.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainId;

/// Kind of administrative domain a region resolves to.
///
/// Tags the API sends that are not one of the four known kinds are kept
/// verbatim in `Other`, so they still take part in entered/left diffing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainType {
    Town,
    District,
    Structure,
    Gate,
    Other(String),
}

impl DomainType {
    /// Case-insensitive parse of an API tag. Never fails.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "town" => Self::Town,
            "district" => Self::District,
            "structure" => Self::Structure,
            "gate" => Self::Gate,
            other => Self::Other(other.to_string()),
        }
    }

    /// Evaluation priority: lower is checked first.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Town => 0,
            Self::District => 1,
            Self::Structure => 2,
            Self::Gate => 3,
            Self::Other(_) => 4,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Town => "town",
            Self::District => "district",
            Self::Structure => "structure",
            Self::Gate => "gate",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a snapshot for entered/left set arithmetic.
///
/// Two snapshots of the same domain taken from different caches may differ
/// in optional fields (parents, description); they are still the same domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainKey {
    pub domain_type: DomainType,
    pub id: DomainId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSnapshot {
    pub id: DomainId,
    pub name: String,
    pub description: Option<String>,
    /// External region this domain is bound to.
    pub region_id: String,
    /// `None` is "not configured" and never denies.
    pub allow_entry: Option<bool>,
    pub allow_exit: Option<bool>,
    pub domain_type: DomainType,
    pub parent_ids: BTreeSet<DomainId>,
    /// Display names of the parents, nearest first.
    pub parent_names: Vec<String>,
    pub child_ids: BTreeSet<DomainId>,
}

impl DomainSnapshot {
    pub fn new(
        id: DomainId,
        name: impl Into<String>,
        region_id: impl Into<String>,
        domain_type: DomainType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            region_id: region_id.into(),
            allow_entry: None,
            allow_exit: None,
            domain_type,
            parent_ids: BTreeSet::new(),
            parent_names: Vec::new(),
            child_ids: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_policy(mut self, allow_entry: Option<bool>, allow_exit: Option<bool>) -> Self {
        self.allow_entry = allow_entry;
        self.allow_exit = allow_exit;
        self
    }

    pub fn with_parent(mut self, id: DomainId, name: Option<String>) -> Self {
        self.parent_ids.insert(id);
        if let Some(name) = name {
            self.parent_names.push(name);
        }
        self
    }

    pub fn key(&self) -> DomainKey {
        DomainKey {
            domain_type: self.domain_type.clone(),
            id: self.id,
        }
    }

    /// Entry is denied only by an explicit `false`.
    pub fn denies_entry(&self) -> bool {
        self.allow_entry == Some(false)
    }

    /// Exit is denied only by an explicit `false`.
    pub fn denies_exit(&self) -> bool {
        self.allow_exit == Some(false)
    }

    pub fn first_parent_name(&self) -> Option<&str> {
        self.parent_names.first().map(String::as_str)
    }

    /// Total order used wherever "first" matters: type priority, then id,
    /// then region.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        self.domain_type
            .priority()
            .cmp(&other.domain_type.priority())
            .then_with(|| self.domain_type.as_str().cmp(other.domain_type.as_str()))
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.region_id.cmp(&other.region_id))
    }
}

/// Everything a set of external region ids currently resolves to.
///
/// Domains are kept deduplicated by [`DomainKey`] and sorted by
/// [`DomainSnapshot::priority_cmp`], so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSnapshot {
    domains: Vec<DomainSnapshot>,
}

impl RegionSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_domains(domains: impl IntoIterator<Item = DomainSnapshot>) -> Self {
        let mut seen = HashSet::new();
        let mut domains: Vec<DomainSnapshot> = domains
            .into_iter()
            .filter(|d| seen.insert(d.key()))
            .collect();
        domains.sort_by(DomainSnapshot::priority_cmp);
        Self { domains }
    }

    pub fn domains(&self) -> &[DomainSnapshot] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains(&self, key: &DomainKey) -> bool {
        self.domains.iter().any(|d| &d.key() == key)
    }

    /// Domains present here but not in `other`, in priority order.
    pub fn difference(&self, other: &RegionSnapshot) -> Vec<DomainSnapshot> {
        let theirs: HashSet<DomainKey> = other.domains.iter().map(DomainSnapshot::key).collect();
        self.domains
            .iter()
            .filter(|d| !theirs.contains(&d.key()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: i32, name: &str, domain_type: DomainType) -> DomainSnapshot {
        DomainSnapshot::new(DomainId::new(id), name, format!("region_{name}"), domain_type)
    }

    #[test]
    fn domain_type_parses_case_insensitively() {
        assert_eq!(DomainType::from_tag("Town"), DomainType::Town);
        assert_eq!(DomainType::from_tag(" GATE "), DomainType::Gate);
        assert_eq!(DomainType::from_tag("Street"), DomainType::Other("street".into()));
    }

    #[test]
    fn unset_flags_never_deny() {
        let domain = snapshot(1, "keep", DomainType::Structure);
        assert!(!domain.denies_entry());
        assert!(!domain.denies_exit());

        let locked = domain.with_policy(Some(false), Some(true));
        assert!(locked.denies_entry());
        assert!(!locked.denies_exit());
    }

    #[test]
    fn snapshot_orders_by_type_priority_then_id() {
        let region = RegionSnapshot::from_domains(vec![
            snapshot(9, "gate", DomainType::Gate),
            snapshot(5, "b", DomainType::Structure),
            snapshot(2, "a", DomainType::Structure),
            snapshot(7, "town", DomainType::Town),
        ]);

        let ids: Vec<i32> = region.domains().iter().map(|d| d.id.get()).collect();
        assert_eq!(ids, vec![7, 2, 5, 9]);
    }

    #[test]
    fn snapshot_deduplicates_by_key_not_by_value() {
        let bare = snapshot(1, "harbor", DomainType::District);
        let with_parent = bare.clone().with_parent(DomainId::new(10), Some("Oldtown".into()));

        let region = RegionSnapshot::from_domains(vec![bare, with_parent]);

        assert_eq!(region.len(), 1);
    }

    #[test]
    fn difference_ignores_non_identity_fields() {
        let old = RegionSnapshot::from_domains(vec![snapshot(1, "harbor", DomainType::District)]);
        let new = RegionSnapshot::from_domains(vec![
            snapshot(1, "harbor", DomainType::District).with_description(Some("docks".into())),
            snapshot(2, "market", DomainType::District),
        ]);

        let entered = new.difference(&old);
        let left = old.difference(&new);

        assert_eq!(entered.len(), 1);
        assert_eq!(entered[0].name, "market");
        assert!(left.is_empty());
    }
}
