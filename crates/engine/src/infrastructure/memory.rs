//! In-memory roster and inventory.
//!
//! Backs the demo binary and the test suite. Game clients with their own
//! roster plug in through the same ports.

use std::collections::BTreeMap;
use std::sync::RwLock;

use delve_domain::{Character, CharacterId, ItemId, Team};

use crate::infrastructure::ports::{CharacterRegistry, InventoryError, InventorySink, RegistryError};

fn poisoned(what: &str) -> String {
    format!("{} lock poisoned", what)
}

/// Character roster held in memory.
#[derive(Default)]
pub struct InMemoryCharacters {
    characters: RwLock<BTreeMap<CharacterId, Character>>,
    active_team: RwLock<Option<Team>>,
}

impl InMemoryCharacters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds characters and forms them into the active team, in order.
    pub fn with_team(name: &str, characters: Vec<Character>) -> Self {
        let members = characters.iter().map(Character::id).collect();
        let registry = Self {
            characters: RwLock::new(characters.into_iter().map(|c| (c.id(), c)).collect()),
            active_team: RwLock::new(None),
        };
        registry.set_active_team(Some(Team::new(name, members)));
        registry
    }

    pub fn set_active_team(&self, team: Option<Team>) {
        match self.active_team.write() {
            Ok(mut guard) => *guard = team,
            Err(poison) => *poison.into_inner() = team,
        }
    }

    /// Drops a character from the roster. Teams are left untouched.
    pub fn remove_character(&self, id: CharacterId) -> Option<Character> {
        match self.characters.write() {
            Ok(mut guard) => guard.remove(&id),
            Err(poison) => poison.into_inner().remove(&id),
        }
    }
}

impl CharacterRegistry for InMemoryCharacters {
    fn get_character(&self, id: CharacterId) -> Result<Option<Character>, RegistryError> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RegistryError::Unavailable(poisoned("character")))?;
        Ok(characters.get(&id).cloned())
    }

    fn save_character(&self, character: &Character) -> Result<(), RegistryError> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RegistryError::Unavailable(poisoned("character")))?;
        characters.insert(character.id(), character.clone());
        Ok(())
    }

    fn add_experience(&self, id: CharacterId, amount: u64) -> Result<(), RegistryError> {
        let mut characters = self
            .characters
            .write()
            .map_err(|_| RegistryError::Unavailable(poisoned("character")))?;
        let character = characters
            .get_mut(&id)
            .ok_or_else(|| RegistryError::CharacterNotFound(id.to_string()))?;
        let levels = character.gain_experience(amount);
        if levels > 0 {
            tracing::info!(
                character_id = %id,
                level = character.level(),
                "Character levelled up"
            );
        }
        Ok(())
    }

    fn active_team(&self) -> Result<Option<Team>, RegistryError> {
        let team = self
            .active_team
            .read()
            .map_err(|_| RegistryError::Unavailable(poisoned("team")))?;
        Ok(team.clone())
    }

    fn list_characters(&self) -> Result<Vec<Character>, RegistryError> {
        let characters = self
            .characters
            .read()
            .map_err(|_| RegistryError::Unavailable(poisoned("character")))?;
        Ok(characters.values().cloned().collect())
    }
}

/// Item counts and gold held in memory.
#[derive(Default)]
pub struct InMemoryInventory {
    items: RwLock<BTreeMap<ItemId, u64>>,
    gold: RwLock<u64>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, item_id: &ItemId) -> u64 {
        self.items
            .read()
            .map(|items| items.get(item_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn gold(&self) -> u64 {
        self.gold.read().map(|gold| *gold).unwrap_or(0)
    }

    pub fn snapshot(&self) -> BTreeMap<ItemId, u64> {
        self.items
            .read()
            .map(|items| items.clone())
            .unwrap_or_default()
    }
}

impl InventorySink for InMemoryInventory {
    fn add_item(&self, item_id: &ItemId, count: u32) -> Result<(), InventoryError> {
        if item_id.is_empty() {
            return Err(InventoryError::Rejected {
                item: item_id.to_string(),
                reason: "empty item id".into(),
            });
        }
        let mut items = self
            .items
            .write()
            .map_err(|_| InventoryError::Unavailable(poisoned("inventory")))?;
        *items.entry(item_id.clone()).or_insert(0) += u64::from(count);
        Ok(())
    }

    fn add_gold(&self, amount: u64) -> Result<(), InventoryError> {
        let mut gold = self
            .gold
            .write()
            .map_err(|_| InventoryError::Unavailable(poisoned("gold")))?;
        *gold = gold.saturating_add(amount);
        Ok(())
    }
}
