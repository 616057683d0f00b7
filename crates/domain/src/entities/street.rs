//! Street records. Streets run through districts and front structures.

use serde::{Deserialize, Serialize};

use crate::{DistrictId, StreetId, StructureId};

/// Full street record.
///
/// Streets carry no region of their own; the districts they cross do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetDetail {
    pub id: StreetId,
    pub name: String,
    #[serde(default)]
    pub district_ids: Vec<DistrictId>,
    #[serde(default)]
    pub districts: Vec<StreetDistrict>,
    #[serde(default)]
    pub structures: Vec<StreetStructure>,
}

/// District stub embedded in a street record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetDistrict {
    pub id: DistrictId,
    pub name: String,
    pub description: Option<String>,
    pub allow_entry: Option<bool>,
    pub allow_exit: Option<bool>,
    #[serde(rename = "wgRegionId")]
    pub region_id: Option<String>,
}

/// Structure stub embedded in a street record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetStructure {
    pub id: StructureId,
    pub name: String,
    pub description: Option<String>,
    pub house_number: Option<i32>,
    pub district_id: Option<DistrictId>,
}

impl StreetDetail {
    pub fn new(id: StreetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            district_ids: Vec::new(),
            districts: Vec::new(),
            structures: Vec::new(),
        }
    }

    /// Structure at `house_number`, if the street has one.
    pub fn structure_at(&self, house_number: i32) -> Option<&StreetStructure> {
        self.structures
            .iter()
            .find(|structure| structure.house_number == Some(house_number))
    }
}
