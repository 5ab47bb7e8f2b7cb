//! Application state and composition.

use std::sync::Arc;

use crate::entities::{DungeonProgression, TemplateStore};
use crate::infrastructure::ports::{
    CharacterRegistry, ClockPort, CombatResolver, InventorySink, PacingPort, PersistenceStore,
    RandomPort, RunEventSink,
};
use crate::use_cases::dungeon::{
    DungeonRunner, PartySnapshots, RewardProcessor, RunGenerator, RunPersistence,
};
use crate::use_cases::DungeonUseCases;

/// Every port the engine talks through. The host game supplies the roster,
/// inventory, combat and presentation; storage, time, randomness and pacing
/// have stock adapters in `infrastructure`.
pub struct AppPorts {
    pub characters: Arc<dyn CharacterRegistry>,
    pub inventory: Arc<dyn InventorySink>,
    pub store: Arc<dyn PersistenceStore>,
    pub combat: Arc<dyn CombatResolver>,
    pub pacer: Arc<dyn PacingPort>,
    pub events: Arc<dyn RunEventSink>,
    pub clock: Arc<dyn ClockPort>,
    pub random: Arc<dyn RandomPort>,
}

/// Main application state.
pub struct App {
    pub templates: Arc<TemplateStore>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub dungeon: DungeonUseCases,
}

impl App {
    pub fn new(templates: Arc<TemplateStore>, ports: AppPorts) -> Self {
        let generator = Arc::new(RunGenerator::new(
            templates.clone(),
            ports.random.clone(),
            ports.clock.clone(),
        ));
        let rewards = Arc::new(RewardProcessor::new(
            ports.characters.clone(),
            ports.inventory.clone(),
            ports.random.clone(),
        ));
        let snapshots = Arc::new(PartySnapshots::new(ports.characters.clone()));
        let persistence = Arc::new(RunPersistence::new(ports.store.clone()));
        let progression = Arc::new(DungeonProgression::new(
            ports.store.clone(),
            templates.clone(),
            ports.inventory.clone(),
        ));

        let runner = Arc::new(DungeonRunner::new(
            generator.clone(),
            rewards.clone(),
            snapshots.clone(),
            persistence.clone(),
            progression.clone(),
            ports.combat,
            ports.characters,
            ports.pacer,
            ports.events,
            ports.clock,
        ));

        let dungeon = DungeonUseCases::new(
            generator,
            rewards,
            snapshots,
            persistence,
            progression,
            runner,
        );

        Self {
            templates,
            use_cases: UseCases { dungeon },
        }
    }

    #[inline]
    pub fn runner(&self) -> &Arc<DungeonRunner> {
        &self.use_cases.dungeon.runner
    }
}
