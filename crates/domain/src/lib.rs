//! Delve domain: the data model and rules of a dungeon run.
//!
//! Everything here is synchronous and free of I/O. Randomness, time and
//! storage arrive through ports owned by the engine crate.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{EncounterSlot, NextEncounter, Run};
pub use entities::{
    BaseRewards, BattleStatistics, Buff, Character, CharacterDungeonSnapshot, CreatureTemplate,
    DefeatReason, DungeonTemplate, Encounter, EncounterKind, MemberBattleStats, RewardInfo,
    RewardItem, RunRecord, Team,
};
pub use error::DomainError;
pub use events::{LogTone, RunEvent, VictoryOutcome};
pub use ids::{CharacterId, DungeonId, EncounterId, ItemId, TeamId, TemplateId};
pub use value_objects::{
    CharacterStats, ChestDrop, ChestTier, CombatStats, CountRange, DifficultyProfile,
    DifficultyType, DropKind, Element, Progress, StatMultiplier,
};
