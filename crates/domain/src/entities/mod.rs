//! Domain entities

mod battle;
mod character;
mod creature_template;
mod dungeon_template;
mod encounter;
pub(crate) mod reward;
mod run_record;
mod team;

pub use battle::{BattleStatistics, MemberBattleStats};
pub use character::{Buff, Character, CharacterDungeonSnapshot};
pub use creature_template::CreatureTemplate;
pub use dungeon_template::{BaseRewards, DungeonTemplate};
pub use encounter::{Encounter, EncounterKind};
pub use reward::{RewardInfo, RewardItem};
pub use run_record::{DefeatReason, RunRecord};
pub use team::Team;
