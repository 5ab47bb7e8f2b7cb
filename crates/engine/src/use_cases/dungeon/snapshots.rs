//! Per-character stat snapshots around a run.

use std::sync::Arc;

use delve_domain::CharacterId;

use crate::infrastructure::ports::{CharacterRegistry, RegistryError};

pub struct PartySnapshots {
    characters: Arc<dyn CharacterRegistry>,
}

impl PartySnapshots {
    pub fn new(characters: Arc<dyn CharacterRegistry>) -> Self {
        Self { characters }
    }

    /// Stores each member's pre-run stats. Returns how many characters
    /// carry a snapshot afterwards.
    pub fn capture(&self, party: &[CharacterId]) -> Result<usize, RegistryError> {
        let mut captured = 0;
        for id in party {
            let Some(mut character) = self.characters.get_character(*id)? else {
                tracing::warn!(character_id = %id, "Party member not found, no snapshot taken");
                continue;
            };
            if character.begin_dungeon_snapshot() {
                self.characters.save_character(&character)?;
            }
            captured += 1;
        }
        tracing::debug!(count = captured, "Party snapshots captured");
        Ok(captured)
    }

    /// Restores every member that carries a snapshot. Failures are logged
    /// per character so one broken record cannot strand the rest.
    pub fn restore(&self, party: &[CharacterId]) -> usize {
        let mut restored = 0;
        for id in party {
            match self.restore_one(*id) {
                Ok(true) => restored += 1,
                Ok(false) => {}
                Err(e) => tracing::error!(
                    character_id = %id,
                    error = %e,
                    "Failed to restore dungeon snapshot"
                ),
            }
        }
        tracing::debug!(count = restored, "Party snapshots restored");
        restored
    }

    fn restore_one(&self, id: CharacterId) -> Result<bool, RegistryError> {
        let Some(mut character) = self.characters.get_character(id)? else {
            return Ok(false);
        };
        // Buffs are cleared even without a snapshot.
        let had_snapshot = character.restore_dungeon_snapshot();
        self.characters.save_character(&character)?;
        Ok(had_snapshot)
    }

    /// Every character currently holding a snapshot, across the roster.
    pub fn holders(&self) -> Result<Vec<CharacterId>, RegistryError> {
        Ok(self
            .characters
            .list_characters()?
            .into_iter()
            .filter(|c| c.has_dungeon_snapshot())
            .map(|c| c.id())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryCharacters;
    use delve_domain::{Character, CharacterStats};

    fn roster() -> (Arc<InMemoryCharacters>, Vec<CharacterId>) {
        let members: Vec<Character> = ["Knight", "Mage"]
            .iter()
            .map(|name| {
                Character::new(*name, CharacterStats::new(200, 30, 10, 10)).expect("valid")
            })
            .collect();
        let ids = members.iter().map(Character::id).collect();
        (Arc::new(InMemoryCharacters::with_team("Party", members)), ids)
    }

    #[test]
    fn capture_then_restore_returns_to_baseline() {
        let (registry, ids) = roster();
        let snapshots = PartySnapshots::new(registry.clone());

        assert_eq!(snapshots.capture(&ids).expect("capture"), 2);
        assert_eq!(snapshots.holders().expect("holders").len(), 2);

        let mut wounded = registry.get_character(ids[0]).expect("get").expect("exists");
        wounded.take_damage(150);
        registry.save_character(&wounded).expect("save");

        assert_eq!(snapshots.restore(&ids), 2);
        let healed = registry.get_character(ids[0]).expect("get").expect("exists");
        assert_eq!(healed.current_stats(), healed.base_stats());
        assert!(snapshots.holders().expect("holders").is_empty());
    }

    #[test]
    fn missing_member_is_skipped() {
        let (registry, mut ids) = roster();
        ids.push(CharacterId::new());
        let snapshots = PartySnapshots::new(registry);

        assert_eq!(snapshots.capture(&ids).expect("capture"), 2);
        assert_eq!(snapshots.restore(&ids), 2);
    }

    #[test]
    fn restore_without_snapshot_is_a_no_op() {
        let (registry, ids) = roster();
        let snapshots = PartySnapshots::new(registry);
        assert_eq!(snapshots.restore(&ids), 0);
    }
}
