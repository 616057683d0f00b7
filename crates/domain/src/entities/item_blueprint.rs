//! Item blueprints: templates the game server instantiates into items.

use serde::{Deserialize, Serialize};

use crate::{EnchantmentDefinitionId, ItemBlueprintId, MaterialRefId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBlueprint {
    pub id: ItemBlueprintId,
    pub name: String,
    pub description: Option<String>,
    pub icon_material_ref_id: Option<MaterialRefId>,
    pub icon_namespace_key: Option<String>,
    pub default_display_name: Option<String>,
    pub default_display_description: Option<String>,
    pub default_quantity: Option<i32>,
    pub max_stack_size: Option<i32>,
    #[serde(default)]
    pub default_enchantments: Vec<BlueprintEnchantment>,
}

/// Enchantment applied to every item minted from a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintEnchantment {
    pub enchantment_definition_id: EnchantmentDefinitionId,
    pub level: i32,
}

impl ItemBlueprint {
    pub fn new(id: ItemBlueprintId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            icon_material_ref_id: None,
            icon_namespace_key: None,
            default_display_name: None,
            default_display_description: None,
            default_quantity: None,
            max_stack_size: None,
            default_enchantments: Vec::new(),
        }
    }
}
