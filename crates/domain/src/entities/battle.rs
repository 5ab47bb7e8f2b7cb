use serde::{Deserialize, Serialize};

use crate::ids::CharacterId;

/// Per-member combat statistics for one battle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBattleStats {
    pub character_id: CharacterId,
    pub name: String,
    pub total_damage: u64,
    pub total_healing: u64,
    pub double_attacks: u32,
    pub triple_attacks: u32,
    pub critical_hits: u32,
    pub is_alive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleStatistics {
    pub turns: u32,
    pub members: Vec<MemberBattleStats>,
}

impl BattleStatistics {
    pub fn total_damage(&self) -> u64 {
        self.members.iter().map(|member| member.total_damage).sum()
    }
}
