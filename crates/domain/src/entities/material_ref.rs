//! References to game materials, used for item and icon lookups.

use serde::{Deserialize, Serialize};

use crate::MaterialRefId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRef {
    pub id: MaterialRefId,
    /// Namespaced key such as `minecraft:oak_log`.
    pub namespace_key: String,
    pub legacy_name: Option<String>,
    pub category: Option<String>,
    pub icon_url: Option<String>,
}

impl MaterialRef {
    pub fn new(id: MaterialRefId, namespace_key: impl Into<String>) -> Self {
        Self {
            id,
            namespace_key: namespace_key.into(),
            legacy_name: None,
            category: None,
            icon_url: None,
        }
    }
}
