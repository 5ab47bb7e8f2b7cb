use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{DungeonId, TemplateId};
use crate::value_objects::{ChestDrop, ChestTier, CountRange, DifficultyProfile, DifficultyType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRewards {
    pub gold: u64,
    pub exp: u64,
}

/// Authored dungeon definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DungeonTemplate {
    pub id: DungeonId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default, rename = "type")]
    pub difficulty: DifficultyType,
    /// Overrides the difficulty's monster count range.
    #[serde(default)]
    pub monster_count: Option<CountRange>,
    #[serde(default)]
    pub mini_boss_count: u32,
    #[serde(default)]
    pub possible_monsters: Vec<TemplateId>,
    #[serde(default)]
    pub possible_mini_bosses: Vec<TemplateId>,
    #[serde(default)]
    pub possible_final_bosses: Vec<TemplateId>,
    #[serde(default)]
    pub rewards: BaseRewards,
    #[serde(default)]
    pub chest_drops: BTreeMap<ChestTier, Vec<ChestDrop>>,
    #[serde(default)]
    pub next_dungeon: Option<DungeonId>,
}

impl DungeonTemplate {
    #[inline]
    pub fn profile(&self) -> DifficultyProfile {
        self.difficulty.profile()
    }

    pub fn monster_count_range(&self) -> CountRange {
        self.monster_count
            .map(CountRange::normalized)
            .unwrap_or_else(|| self.profile().monster_count)
    }
}
