//! Dungeon unlock and completion tracking.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use delve_domain::{DungeonId, DungeonTemplate};

use crate::entities::TemplateStore;
use crate::infrastructure::ports::{InventorySink, PersistenceStore, StoreError};

pub const PROGRESSION_KEY: &str = "dungeon_progression";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionState {
    #[serde(default)]
    pub unlocked: Vec<DungeonId>,
    #[serde(default)]
    pub completed: Vec<DungeonId>,
}

/// An unlocked dungeon as offered to the player.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableDungeon {
    pub template: DungeonTemplate,
    pub completed: bool,
}

/// What clearing a dungeon changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub first_completion: bool,
    pub gold_awarded: u64,
    pub unlocked: Option<DungeonId>,
}

pub struct DungeonProgression {
    store: Arc<dyn PersistenceStore>,
    templates: Arc<TemplateStore>,
    inventory: Arc<dyn InventorySink>,
}

impl DungeonProgression {
    pub fn new(
        store: Arc<dyn PersistenceStore>,
        templates: Arc<TemplateStore>,
        inventory: Arc<dyn InventorySink>,
    ) -> Self {
        Self {
            store,
            templates,
            inventory,
        }
    }

    /// Current state. The entry dungeon is always unlocked; unreadable
    /// state is treated as a fresh profile.
    pub fn state(&self) -> Result<ProgressionState, StoreError> {
        let mut state = match self.store.load(PROGRESSION_KEY)? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable dungeon progression");
                ProgressionState::default()
            }),
            None => ProgressionState::default(),
        };
        if let Some(first) = self.templates.first_dungeon() {
            if !state.unlocked.contains(&first.id) {
                state.unlocked.insert(0, first.id.clone());
            }
        }
        Ok(state)
    }

    pub fn is_unlocked(&self, dungeon_id: &DungeonId) -> Result<bool, StoreError> {
        Ok(self.state()?.unlocked.contains(dungeon_id))
    }

    pub fn is_completed(&self, dungeon_id: &DungeonId) -> Result<bool, StoreError> {
        Ok(self.state()?.completed.contains(dungeon_id))
    }

    /// Unlocked dungeons in level order, flagged if already cleared.
    pub fn available_dungeons(&self) -> Result<Vec<AvailableDungeon>, StoreError> {
        let state = self.state()?;
        Ok(self
            .templates
            .dungeons()
            .into_iter()
            .filter(|dungeon| state.unlocked.contains(&dungeon.id))
            .map(|dungeon| AvailableDungeon {
                completed: state.completed.contains(&dungeon.id),
                template: dungeon.clone(),
            })
            .collect())
    }

    /// Returns false if the dungeon was already unlocked.
    pub fn unlock(&self, dungeon_id: &DungeonId) -> Result<bool, StoreError> {
        let mut state = self.state()?;
        if state.unlocked.contains(dungeon_id) {
            return Ok(false);
        }
        state.unlocked.push(dungeon_id.clone());
        self.save(&state)?;
        tracing::info!(dungeon_id = %dungeon_id, "Dungeon unlocked");
        Ok(true)
    }

    /// Marks a dungeon cleared. The first clear pays the dungeon's gold
    /// reward and unlocks the next dungeon in the chain.
    pub fn record_completion(
        &self,
        dungeon_id: &DungeonId,
    ) -> Result<CompletionOutcome, StoreError> {
        let mut state = self.state()?;
        if state.completed.contains(dungeon_id) {
            return Ok(CompletionOutcome::default());
        }
        state.completed.push(dungeon_id.clone());

        let template = self.templates.dungeon(dungeon_id);
        let unlocked = template
            .and_then(|t| t.next_dungeon.clone())
            .filter(|next| !state.unlocked.contains(next));
        if let Some(next) = unlocked.as_ref() {
            state.unlocked.push(next.clone());
        }
        self.save(&state)?;

        let gold = template.map(|t| t.rewards.gold).unwrap_or(0);
        let gold_awarded = match self.inventory.add_gold(gold) {
            Ok(()) => gold,
            Err(e) => {
                tracing::warn!(
                    dungeon_id = %dungeon_id,
                    gold,
                    error = %e,
                    "Failed to grant first-clear gold"
                );
                0
            }
        };

        tracing::info!(
            dungeon_id = %dungeon_id,
            gold = gold_awarded,
            unlocked = ?unlocked.as_ref().map(DungeonId::as_str),
            "Dungeon cleared for the first time"
        );

        Ok(CompletionOutcome {
            first_completion: true,
            gold_awarded,
            unlocked,
        })
    }

    fn save(&self, state: &ProgressionState) -> Result<(), StoreError> {
        self.store
            .save(PROGRESSION_KEY, &serde_json::to_value(state)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryInventory;
    use crate::infrastructure::persistence::InMemoryStore;
    use crate::infrastructure::ports::{InventoryError, MockInventorySink};

    fn progression(inventory: Arc<dyn InventorySink>) -> (DungeonProgression, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let progression =
            DungeonProgression::new(store.clone(), Arc::new(TemplateStore::builtin()), inventory);
        (progression, store)
    }

    #[test]
    fn fresh_profile_unlocks_entry_dungeon_only() {
        let (progression, _) = progression(Arc::new(InMemoryInventory::new()));

        assert!(progression
            .is_unlocked(&DungeonId::from("forest_cave"))
            .expect("state"));
        assert!(!progression
            .is_unlocked(&DungeonId::from("mountain_path"))
            .expect("state"));

        let available = progression.available_dungeons().expect("available");
        assert_eq!(available.len(), 1);
    }

    #[test]
    fn first_clear_pays_gold_and_unlocks_next() {
        let inventory = Arc::new(InMemoryInventory::new());
        let (progression, _) = progression(inventory.clone());
        let forest = DungeonId::from("forest_cave");

        let outcome = progression.record_completion(&forest).expect("complete");
        assert!(outcome.first_completion);
        assert_eq!(outcome.gold_awarded, 5000);
        assert_eq!(outcome.unlocked, Some(DungeonId::from("mountain_path")));
        assert_eq!(inventory.gold(), 5000);

        let available = progression.available_dungeons().expect("available");
        assert_eq!(available.len(), 2);
        assert!(available[0].completed);
        assert!(!available[1].completed);

        let again = progression.record_completion(&forest).expect("complete");
        assert_eq!(again, CompletionOutcome::default());
        assert_eq!(inventory.gold(), 5000);
        assert!(progression.is_completed(&forest).expect("state"));
    }

    #[test]
    fn when_gold_rejected_completion_still_counts() {
        let mut inventory = MockInventorySink::new();
        inventory.expect_add_gold().returning(|_| {
            Err(InventoryError::Unavailable("offline".into()))
        });
        let (progression, _) = progression(Arc::new(inventory));

        let outcome = progression
            .record_completion(&DungeonId::from("forest_cave"))
            .expect("complete");
        assert!(outcome.first_completion);
        assert_eq!(outcome.gold_awarded, 0);
    }

    #[test]
    fn corrupted_state_resets_to_fresh_profile() {
        let (progression, store) = progression(Arc::new(InMemoryInventory::new()));
        store
            .save(PROGRESSION_KEY, &serde_json::json!({"unlocked": 42}))
            .expect("save");

        let state = progression.state().expect("state");
        assert_eq!(state.unlocked, vec![DungeonId::from("forest_cave")]);
        assert!(state.completed.is_empty());
    }

    #[test]
    fn unlock_is_idempotent() {
        let (progression, _) = progression(Arc::new(InMemoryInventory::new()));
        let ruins = DungeonId::from("ancient_ruins");
        assert!(progression.unlock(&ruins).expect("unlock"));
        assert!(!progression.unlock(&ruins).expect("unlock"));
    }
}
