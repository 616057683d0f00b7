//! Region-to-domain decision records from the domains search endpoint.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::DomainId;

/// One domain bound to an external region, with its parent chain inlined.
///
/// Parents are nested records rather than ids, so a malformed response can
/// repeat the same region several levels down; consumers walking the chain
/// must guard against revisiting a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRegionSummary {
    pub id: Option<DomainId>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "wgRegionId")]
    pub region_id: Option<String>,
    pub allow_entry: Option<bool>,
    pub allow_exit: Option<bool>,
    pub domain_type: Option<String>,
    #[serde(default, rename = "parentDomainDecisions")]
    pub parents: Vec<DomainRegionSummary>,
}

impl DomainRegionSummary {
    pub fn new(id: DomainId, name: impl Into<String>, region_id: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            description: None,
            region_id: Some(region_id.into()),
            allow_entry: None,
            allow_exit: None,
            domain_type: None,
            parents: Vec::new(),
        }
    }

    pub fn with_type(mut self, domain_type: impl Into<String>) -> Self {
        self.domain_type = Some(domain_type.into());
        self
    }

    pub fn with_parent(mut self, parent: DomainRegionSummary) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn with_entry(mut self, allowed: bool) -> Self {
        self.allow_entry = Some(allowed);
        self
    }

    pub fn with_exit(mut self, allowed: bool) -> Self {
        self.allow_exit = Some(allowed);
        self
    }
}

/// Batched lookup of the domains bound to a set of external regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainRegionQuery {
    #[serde(rename = "wgRegionIds")]
    pub region_ids: BTreeSet<String>,
    /// Ask the API to inline each domain's parent chain.
    pub top_down_hierarchy: bool,
}

impl DomainRegionQuery {
    pub fn with_hierarchy<I, S>(region_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            region_ids: region_ids.into_iter().map(Into::into).collect(),
            top_down_hierarchy: true,
        }
    }
}
