//! Value objects for the dungeon domain

mod chest;
mod difficulty;
mod element;
mod progress;
mod stats;

pub use chest::{ChestDrop, ChestTier, DropKind};
pub use difficulty::{CountRange, DifficultyProfile, DifficultyType, StatMultiplier};
pub use element::Element;
pub use progress::Progress;
pub use stats::{CharacterStats, CombatStats};
