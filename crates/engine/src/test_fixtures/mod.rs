//! Test fixtures: characters, small dungeons and a fully wired engine.
//!
//! ```rust,ignore
//! let harness = Harness::builder()
//!     .dungeon(dungeon("crypt", 3, 1, true))
//!     .script([ScriptedBattle::Win, ScriptedBattle::Lose { damage: 5 }])
//!     .build();
//! let outcome = harness.runner().start(&DungeonId::from("crypt")).await;
//! ```

pub mod combat_mocks;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use delve_domain::{
    BaseRewards, Character, CharacterId, CharacterStats, CountRange, DifficultyType, DungeonId,
    DungeonTemplate, LogTone, RunEvent, TemplateId,
};

pub use combat_mocks::{GatedPacer, ScriptedBattle, ScriptedCombat};

use crate::app::{App, AppPorts};
use crate::entities::TemplateStore;
use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::memory::{InMemoryCharacters, InMemoryInventory};
use crate::infrastructure::pacing::NoPacing;
use crate::infrastructure::persistence::InMemoryStore;
use crate::infrastructure::ports::{CharacterRegistry, PacingPort, RunEventSink};
use crate::use_cases::dungeon::DungeonRunner;

// =============================================================================
// Domain Builders
// =============================================================================

pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid test time")
}

pub fn hero(name: &str, speed: u32) -> Character {
    Character::new(name, CharacterStats::new(200, 40, 10, speed)).expect("valid hero")
}

pub fn party() -> Vec<Character> {
    vec![
        hero("Aria", 12),
        hero("Bram", 9),
        hero("Cyra", 15),
        hero("Dane", 7),
    ]
}

/// Normal-difficulty dungeon over the fallback creature tables with an
/// exact monster count.
pub fn dungeon(id: &str, monsters: u32, mini_bosses: u32, final_boss: bool) -> DungeonTemplate {
    DungeonTemplate {
        id: DungeonId::from(id),
        name: format!("Test {}", id),
        description: String::new(),
        level: 1,
        difficulty: DifficultyType::Normal,
        monster_count: Some(CountRange::exactly(monsters)),
        mini_boss_count: mini_bosses,
        possible_monsters: vec![TemplateId::from("slime"), TemplateId::from("goblin")],
        possible_mini_bosses: vec![TemplateId::from("goblinChief")],
        possible_final_bosses: if final_boss {
            vec![TemplateId::from("forestGuardian")]
        } else {
            Vec::new()
        },
        rewards: BaseRewards { gold: 250, exp: 100 },
        chest_drops: BTreeMap::new(),
        next_dungeon: None,
    }
}

// =============================================================================
// Event Capture
// =============================================================================

/// Keeps every published event for later assertions.
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().expect("events lock").clone()
    }

    pub fn logs(&self) -> Vec<(String, LogTone)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                RunEvent::BattleLog { message, tone } => Some((message, tone)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&RunEvent) -> bool) -> usize {
        self.events().iter().filter(|event| matches(event)).count()
    }

    pub fn clear(&self) {
        self.events.lock().expect("events lock").clear();
    }
}

impl RunEventSink for RecordingEventSink {
    fn publish(&self, event: RunEvent) {
        self.events.lock().expect("events lock").push(event);
    }
}

// =============================================================================
// Harness
// =============================================================================

/// A wired engine over in-memory adapters, with handles to inspect them.
pub struct Harness {
    pub app: App,
    pub characters: Arc<InMemoryCharacters>,
    pub inventory: Arc<InMemoryInventory>,
    pub store: Arc<InMemoryStore>,
    pub combat: Arc<ScriptedCombat>,
    pub events: Arc<RecordingEventSink>,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    pub fn runner(&self) -> &Arc<DungeonRunner> {
        self.app.runner()
    }

    pub fn party_ids(&self) -> Vec<CharacterId> {
        self.characters
            .active_team()
            .expect("registry available")
            .map(|team| team.members)
            .unwrap_or_default()
    }

    pub fn character(&self, id: CharacterId) -> Character {
        self.characters
            .get_character(id)
            .expect("registry available")
            .expect("character exists")
    }
}

#[derive(Default)]
pub struct HarnessBuilder {
    dungeons: Vec<DungeonTemplate>,
    script: Vec<ScriptedBattle>,
    wound: Option<u32>,
    pacer: Option<Arc<dyn PacingPort>>,
    store: Option<Arc<InMemoryStore>>,
    characters: Option<Arc<InMemoryCharacters>>,
}

impl HarnessBuilder {
    pub fn dungeon(mut self, dungeon: DungeonTemplate) -> Self {
        self.dungeons.push(dungeon);
        self
    }

    pub fn script(mut self, battles: impl IntoIterator<Item = ScriptedBattle>) -> Self {
        self.script.extend(battles);
        self
    }

    pub fn wounding(mut self, amount: u32) -> Self {
        self.wound = Some(amount);
        self
    }

    pub fn pacer(mut self, pacer: Arc<dyn PacingPort>) -> Self {
        self.pacer = Some(pacer);
        self
    }

    /// Shares storage with an earlier harness, as after a restart.
    pub fn store(mut self, store: Arc<InMemoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn characters(mut self, characters: Arc<InMemoryCharacters>) -> Self {
        self.characters = Some(characters);
        self
    }

    pub fn build(self) -> Harness {
        let characters = self
            .characters
            .unwrap_or_else(|| Arc::new(InMemoryCharacters::with_team("Vanguard", party())));
        let inventory = Arc::new(InMemoryInventory::new());
        let store = self.store.unwrap_or_else(|| Arc::new(InMemoryStore::new()));
        let events = Arc::new(RecordingEventSink::new());

        let mut combat = ScriptedCombat::scripted(self.script);
        if let Some(amount) = self.wound {
            let registry: Arc<dyn CharacterRegistry> = characters.clone();
            combat = combat.wounding(registry, amount);
        }
        let combat = Arc::new(combat);

        let templates = Arc::new(TemplateStore::new(
            self.dungeons,
            BTreeMap::new(),
            BTreeMap::new(),
        ));
        let app = App::new(
            templates,
            AppPorts {
                characters: characters.clone(),
                inventory: inventory.clone(),
                store: store.clone(),
                combat: combat.clone(),
                pacer: self.pacer.unwrap_or_else(|| Arc::new(NoPacing)),
                events: events.clone(),
                clock: Arc::new(FixedClock(test_time())),
                random: Arc::new(FixedRandom::lowest()),
            },
        );

        Harness {
            app,
            characters,
            inventory,
            store,
            combat,
            events,
        }
    }
}
