use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// Chest rarity. Each tier maps to a stable inventory item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChestTier {
    Silver,
    Gold,
    Red,
    Rainbow,
}

impl ChestTier {
    pub fn item_key(&self) -> &'static str {
        match self {
            ChestTier::Silver => "silver_chest",
            ChestTier::Gold => "gold_chest",
            ChestTier::Red => "red_chest",
            ChestTier::Rainbow => "rainbow_chest",
        }
    }

    pub fn item_id(&self) -> ItemId {
        ItemId::new(self.item_key())
    }
}

impl fmt::Display for ChestTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.item_key())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropKind {
    #[default]
    Material,
    Weapon,
}

/// One entry of a chest's content table, consumed when the chest is opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChestDrop {
    pub item_id: ItemId,
    #[serde(default, rename = "type")]
    pub kind: DropKind,
    pub rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids_are_stable() {
        assert_eq!(ChestTier::Silver.item_id().as_str(), "silver_chest");
        assert_eq!(ChestTier::Rainbow.to_string(), "rainbow_chest");
    }
}
