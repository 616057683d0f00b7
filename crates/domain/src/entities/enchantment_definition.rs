//! Enchantment definitions (vanilla and custom).

use serde::{Deserialize, Serialize};

use crate::{EnchantmentDefinitionId, MaterialRefId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnchantmentDefinition {
    pub id: EnchantmentDefinitionId,
    pub key: String,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    pub max_level: Option<i32>,
    pub base_enchantment_ref_id: Option<MaterialRefId>,
    pub base_enchantment_namespace_key: Option<String>,
}

impl EnchantmentDefinition {
    pub fn new(
        id: EnchantmentDefinitionId,
        key: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            display_name: display_name.into(),
            description: None,
            is_custom: false,
            max_level: None,
            base_enchantment_ref_id: None,
            base_enchantment_namespace_key: None,
        }
    }
}
