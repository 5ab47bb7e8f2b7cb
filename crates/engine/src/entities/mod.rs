//! Entity modules wrapping domain data with engine-side lookups.

pub mod progression;
pub mod templates;

pub use progression::{AvailableDungeon, CompletionOutcome, DungeonProgression, ProgressionState};
pub use templates::{TemplateSource, TemplateStore};
