//! District records as returned by the world API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DistrictId, LocationId, StreetId, StructureId, TownId};

/// Full district record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDetail {
    pub id: DistrictId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub allow_entry: Option<bool>,
    pub allow_exit: Option<bool>,
    #[serde(rename = "wgRegionId")]
    pub region_id: Option<String>,
    pub location_id: Option<LocationId>,
    pub town_id: Option<TownId>,
    /// Owning town, when the API expands it.
    pub town: Option<DistrictTown>,
    #[serde(default)]
    pub street_ids: Vec<StreetId>,
    #[serde(default)]
    pub structures: Vec<DistrictStructure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictTown {
    pub id: TownId,
    pub name: String,
    pub description: Option<String>,
    pub allow_entry: Option<bool>,
    pub allow_exit: Option<bool>,
    #[serde(rename = "wgRegionId")]
    pub region_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStructure {
    pub id: StructureId,
    pub name: String,
    pub description: Option<String>,
    pub house_number: Option<i32>,
    pub street_id: Option<StreetId>,
}

impl DistrictDetail {
    pub fn new(id: DistrictId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            created_at: None,
            allow_entry: None,
            allow_exit: None,
            region_id: None,
            location_id: None,
            town_id: None,
            town: None,
            street_ids: Vec::new(),
            structures: Vec::new(),
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

    pub fn in_town(mut self, id: TownId, name: impl Into<String>) -> Self {
        self.town_id = Some(id);
        self.town = Some(DistrictTown {
            id,
            name: name.into(),
            description: None,
            allow_entry: None,
            allow_exit: None,
            region_id: None,
        });
        self
    }
}
