use serde::{Deserialize, Serialize};

use crate::entities::{EncounterKind, RewardItem, RunRecord};
use crate::ids::{DungeonId, EncounterId};
use crate::value_objects::{Element, Progress};

/// Outcome of `Run::record_victory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VictoryOutcome {
    pub kind: EncounterKind,
    pub progress: Progress,
    pub final_boss_defeated: bool,
}

/// Display tone for battle log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTone {
    Info,
    Success,
    Warning,
    Danger,
}

/// Presentation events published by the dungeon runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RunEvent {
    #[serde(rename_all = "camelCase")]
    RunStarted {
        dungeon_id: DungeonId,
        dungeon_name: String,
        total_encounters: u32,
    },
    #[serde(rename_all = "camelCase")]
    EncounterAppeared {
        dungeon_id: DungeonId,
        encounter_id: EncounterId,
        name: String,
        kind: EncounterKind,
        attribute: Element,
        max_hp: u32,
    },
    BattleLog {
        message: String,
        tone: LogTone,
    },
    #[serde(rename_all = "camelCase")]
    ProgressUpdated {
        dungeon_id: DungeonId,
        progress: Progress,
    },
    #[serde(rename_all = "camelCase")]
    RunCompleted {
        dungeon_id: DungeonId,
        dungeon_name: String,
        final_boss_defeated: bool,
        first_completion: bool,
        experience: u64,
        rewards: Vec<RewardItem>,
    },
    RunFailed {
        record: RunRecord,
    },
    #[serde(rename_all = "camelCase")]
    RunExited {
        dungeon_id: DungeonId,
    },
    #[serde(rename_all = "camelCase")]
    RunPaused {
        dungeon_id: DungeonId,
    },
    #[serde(rename_all = "camelCase")]
    RunResumed {
        dungeon_id: DungeonId,
    },
}

impl RunEvent {
    pub fn log(message: impl Into<String>, tone: LogTone) -> Self {
        RunEvent::BattleLog {
            message: message.into(),
            tone,
        }
    }
}
