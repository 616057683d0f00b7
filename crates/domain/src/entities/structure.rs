//! Structure records as returned by the world API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DistrictId, LocationId, StreetId, StructureId};

/// Full structure record (a building or other enclosed site in a district).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureDetail {
    pub id: StructureId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub allow_entry: Option<bool>,
    pub allow_exit: Option<bool>,
    #[serde(rename = "wgRegionId")]
    pub region_id: Option<String>,
    pub location_id: Option<LocationId>,
    pub street_id: Option<StreetId>,
    pub district_id: Option<DistrictId>,
    pub house_number: Option<i32>,
}

impl StructureDetail {
    pub fn new(id: StructureId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            created_at: None,
            allow_entry: None,
            allow_exit: None,
            region_id: None,
            location_id: None,
            street_id: None,
            district_id: None,
            house_number: None,
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

    pub fn in_district(mut self, district_id: DistrictId) -> Self {
        self.district_id = Some(district_id);
        self
    }
}
