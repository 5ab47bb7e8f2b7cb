use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregates::Run;
use crate::ids::DungeonId;

use super::{Encounter, EncounterKind, MemberBattleStats};

/// Why a run ended in defeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatReason {
    #[serde(rename = "insufficient output")]
    InsufficientOutput,
    #[serde(rename = "damage too low")]
    DamageTooLow,
    #[serde(rename = "no effective damage")]
    NoEffectiveDamage,
    #[serde(rename = "battle failed")]
    BattleFailed,
    #[serde(rename = "combat aborted")]
    CombatAborted,
}

impl DefeatReason {
    /// Classifies a loss by how much of the enemy's max HP the team removed.
    pub fn classify(total_damage: u64, enemy_max_hp: u32) -> Self {
        if enemy_max_hp == 0 {
            return DefeatReason::BattleFailed;
        }
        let ratio = total_damage as f64 / f64::from(enemy_max_hp);
        if ratio < 0.1 {
            DefeatReason::InsufficientOutput
        } else if ratio < 0.3 {
            DefeatReason::DamageTooLow
        } else if ratio < 0.5 {
            DefeatReason::NoEffectiveDamage
        } else {
            DefeatReason::BattleFailed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefeatReason::InsufficientOutput => "insufficient output",
            DefeatReason::DamageTooLow => "damage too low",
            DefeatReason::NoEffectiveDamage => "no effective damage",
            DefeatReason::BattleFailed => "battle failed",
            DefeatReason::CombatAborted => "combat aborted",
        }
    }
}

impl fmt::Display for DefeatReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a failed run, kept for post-mortem display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    pub dungeon_id: DungeonId,
    pub dungeon_name: String,
    /// 1-based position of the fatal encounter.
    pub floor: u32,
    pub monster_name: String,
    pub monster_kind: EncounterKind,
    pub defeat_reason: DefeatReason,
    pub team_stats: Vec<MemberBattleStats>,
    pub defeated_monsters: u32,
    pub total_monsters: u32,
    pub defeated_mini_bosses: u32,
    pub total_mini_bosses: u32,
    pub ended_at: DateTime<Utc>,
}

impl RunRecord {
    pub fn from_defeat(
        run: &Run,
        encounter: &Encounter,
        team_stats: Vec<MemberBattleStats>,
        defeat_reason: DefeatReason,
        ended_at: DateTime<Utc>,
    ) -> Self {
        Self {
            dungeon_id: run.dungeon_id().clone(),
            dungeon_name: run.dungeon_name().to_string(),
            floor: run.defeated_encounters() as u32 + 1,
            monster_name: encounter.name.clone(),
            monster_kind: encounter.kind(),
            defeat_reason,
            team_stats,
            defeated_monsters: run.defeated_monsters() as u32,
            total_monsters: run.monsters().len() as u32,
            defeated_mini_bosses: run.defeated_mini_bosses() as u32,
            total_mini_bosses: run.mini_bosses().len() as u32,
            ended_at,
        }
    }
}
