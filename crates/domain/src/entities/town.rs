//! Town records as returned by the world API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DistrictId, LocationId, StreetId, TownId};

/// Full town record.
///
/// Towns are the top of the administrative hierarchy. `region_id` links the
/// town to the external spatial region that encloses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownDetail {
    pub id: TownId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// `None` means the API did not say; it is not a denial.
    pub allow_entry: Option<bool>,
    pub allow_exit: Option<bool>,
    #[serde(rename = "wgRegionId")]
    pub region_id: Option<String>,
    pub location_id: Option<LocationId>,
    #[serde(default)]
    pub street_ids: Vec<StreetId>,
    #[serde(default)]
    pub district_ids: Vec<DistrictId>,
    #[serde(default)]
    pub districts: Vec<TownDistrict>,
}

/// District stub embedded in a town record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownDistrict {
    pub id: DistrictId,
    pub name: String,
    pub description: Option<String>,
    pub allow_entry: Option<bool>,
    pub allow_exit: Option<bool>,
    #[serde(rename = "wgRegionId")]
    pub region_id: Option<String>,
}

impl TownDetail {
    pub fn new(id: TownId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            created_at: None,
            allow_entry: None,
            allow_exit: None,
            region_id: None,
            location_id: None,
            street_ids: Vec::new(),
            district_ids: Vec::new(),
            districts: Vec::new(),
        }
    }

    pub fn with_region(mut self, region_id: impl Into<String>) -> Self {
        self.region_id = Some(region_id.into());
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
