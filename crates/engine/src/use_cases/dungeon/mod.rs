//! Dungeon use cases.
//!
//! Generation, rewards, party snapshots, persistence and the runner that
//! ties them into a single run lifecycle.

use std::sync::Arc;

mod error;
pub mod generate;
pub mod persistence;
pub mod rewards;
pub mod runner;
pub mod snapshots;


pub use error::DungeonError;
pub use generate::{FallbackReport, GeneratedRun, RunGenerator};
pub use persistence::{DiscardReason, Recovery, RunPersistence};
pub use rewards::RewardProcessor;
pub use runner::{
    DungeonRunner, RunOutcome, RunStarted, RunSummary, RunnerState, SessionRestore, StepOutcome,
};
pub use snapshots::PartySnapshots;

use crate::entities::DungeonProgression;

/// Container for dungeon use cases.
pub struct DungeonUseCases {
    pub generator: Arc<RunGenerator>,
    pub rewards: Arc<RewardProcessor>,
    pub snapshots: Arc<PartySnapshots>,
    pub persistence: Arc<RunPersistence>,
    pub progression: Arc<DungeonProgression>,
    pub runner: Arc<DungeonRunner>,
}

impl DungeonUseCases {
    pub fn new(
        generator: Arc<RunGenerator>,
        rewards: Arc<RewardProcessor>,
        snapshots: Arc<PartySnapshots>,
        persistence: Arc<RunPersistence>,
        progression: Arc<DungeonProgression>,
        runner: Arc<DungeonRunner>,
    ) -> Self {
        Self {
            generator,
            rewards,
            snapshots,
            persistence,
            progression,
            runner,
        }
    }
}
