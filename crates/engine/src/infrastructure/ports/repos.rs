//! Repository port traits for game state outside the engine.

use delve_domain::{Character, CharacterId, ItemId, Team};

use super::error::{InventoryError, RegistryError, StoreError};

// =============================================================================
// Character Roster
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait CharacterRegistry: Send + Sync {
    fn get_character(&self, id: CharacterId) -> Result<Option<Character>, RegistryError>;
    fn save_character(&self, character: &Character) -> Result<(), RegistryError>;
    fn add_experience(&self, id: CharacterId, amount: u64) -> Result<(), RegistryError>;
    /// The team that fights the next run, if one is formed.
    fn active_team(&self) -> Result<Option<Team>, RegistryError>;
    fn list_characters(&self) -> Result<Vec<Character>, RegistryError>;
}

// =============================================================================
// Inventory
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait InventorySink: Send + Sync {
    fn add_item(&self, item_id: &ItemId, count: u32) -> Result<(), InventoryError>;
    fn add_gold(&self, amount: u64) -> Result<(), InventoryError>;
}

// =============================================================================
// Key-Value Persistence
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait PersistenceStore: Send + Sync {
    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StoreError>;
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
