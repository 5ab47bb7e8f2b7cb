//! Character entity as seen by the dungeon engine.
//!
//! A character entering a run stores a copy of its base stats. Any stat drift
//! picked up in the dungeon (damage, buffs, one-time passives) is undone by
//! restoring that copy when the run ends.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::CharacterId;
use crate::value_objects::CharacterStats;

/// Experience needed per level step.
const EXPERIENCE_PER_LEVEL: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buff {
    pub name: String,
    pub remaining_turns: u32,
}

/// Pre-run stat copy plus the passives already applied this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDungeonSnapshot {
    pub original_stats: CharacterStats,
    #[serde(default)]
    pub applied_passives: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    name: String,
    level: u32,
    experience: u64,
    base_stats: CharacterStats,
    current_stats: CharacterStats,
    #[serde(default)]
    buffs: Vec<Buff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dungeon_snapshot: Option<CharacterDungeonSnapshot>,
}

impl Character {
    pub fn new(name: impl Into<String>, base_stats: CharacterStats) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        Ok(Self {
            id: CharacterId::new(),
            name,
            level: 1,
            experience: 0,
            base_stats,
            current_stats: base_stats,
            buffs: Vec::new(),
            dungeon_snapshot: None,
        })
    }

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn experience(&self) -> u64 {
        self.experience
    }

    #[inline]
    pub fn base_stats(&self) -> &CharacterStats {
        &self.base_stats
    }

    #[inline]
    pub fn current_stats(&self) -> &CharacterStats {
        &self.current_stats
    }

    #[inline]
    pub fn buffs(&self) -> &[Buff] {
        &self.buffs
    }

    #[inline]
    pub fn dungeon_snapshot(&self) -> Option<&CharacterDungeonSnapshot> {
        self.dungeon_snapshot.as_ref()
    }

    #[inline]
    pub fn has_dungeon_snapshot(&self) -> bool {
        self.dungeon_snapshot.is_some()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current_stats.is_alive()
    }

    // =========================================================================
    // Combat mutations
    // =========================================================================

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current_stats.hp);
        self.current_stats.hp -= dealt;
        dealt
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        let missing = self.current_stats.max_hp.saturating_sub(self.current_stats.hp);
        let healed = amount.min(missing);
        self.current_stats.hp += healed;
        healed
    }

    pub fn add_buff(&mut self, buff: Buff) {
        self.buffs.push(buff);
    }

    pub fn clear_buffs(&mut self) {
        self.buffs.clear();
    }

    /// Applies a stat change that lasts for the rest of the run.
    pub fn modify_current_stats(&mut self, apply: impl FnOnce(&mut CharacterStats)) {
        apply(&mut self.current_stats);
    }

    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u64) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let target = 1 + (self.experience / EXPERIENCE_PER_LEVEL) as u32;
        let gained = target.saturating_sub(self.level);
        self.level = self.level.max(target);
        gained
    }

    // =========================================================================
    // Dungeon snapshot
    // =========================================================================

    /// Stores the pre-run stat copy. An existing snapshot is kept so a
    /// resumed run never overwrites the original baseline.
    pub fn begin_dungeon_snapshot(&mut self) -> bool {
        if self.dungeon_snapshot.is_some() {
            return false;
        }
        self.current_stats = self.base_stats;
        self.dungeon_snapshot = Some(CharacterDungeonSnapshot {
            original_stats: self.base_stats,
            applied_passives: BTreeSet::new(),
        });
        true
    }

    /// Records a one-time passive. Returns false if it was already applied
    /// this run, or if the character is not in a run.
    pub fn mark_passive_applied(&mut self, passive: &str) -> bool {
        match self.dungeon_snapshot.as_mut() {
            Some(snapshot) => snapshot.applied_passives.insert(passive.to_string()),
            None => false,
        }
    }

    /// Restores the pre-run stats, then drops the snapshot and all buffs.
    pub fn restore_dungeon_snapshot(&mut self) -> bool {
        self.clear_buffs();
        match self.dungeon_snapshot.take() {
            Some(snapshot) => {
                self.current_stats = snapshot.original_stats;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knight() -> Character {
        Character::new("Knight", CharacterStats::new(300, 40, 20, 10)).expect("valid character")
    }

    #[test]
    fn when_name_blank_returns_error() {
        let result = Character::new("  ", CharacterStats::new(1, 1, 1, 1));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn restore_undoes_run_drift() {
        let mut character = knight();
        assert!(character.begin_dungeon_snapshot());

        character.take_damage(120);
        character.modify_current_stats(|stats| stats.attack += 15);
        character.add_buff(Buff {
            name: "war_cry".into(),
            remaining_turns: 3,
        });
        assert!(character.mark_passive_applied("iron_will"));

        assert!(character.restore_dungeon_snapshot());
        assert_eq!(character.current_stats(), character.base_stats());
        assert!(character.buffs().is_empty());
        assert!(!character.has_dungeon_snapshot());
    }

    #[test]
    fn second_snapshot_keeps_original_baseline() {
        let mut character = knight();
        character.begin_dungeon_snapshot();
        character.take_damage(50);

        assert!(!character.begin_dungeon_snapshot());
        assert_eq!(character.current_stats().hp, 250);
    }

    #[test]
    fn passive_applies_once_per_run() {
        let mut character = knight();
        assert!(!character.mark_passive_applied("iron_will"));

        character.begin_dungeon_snapshot();
        assert!(character.mark_passive_applied("iron_will"));
        assert!(!character.mark_passive_applied("iron_will"));

        character.restore_dungeon_snapshot();
        character.begin_dungeon_snapshot();
        assert!(character.mark_passive_applied("iron_will"));
    }

    #[test]
    fn experience_levels_up() {
        let mut character = knight();
        assert_eq!(character.gain_experience(2500), 2);
        assert_eq!(character.level(), 3);
        assert_eq!(character.gain_experience(100), 0);
    }

    #[test]
    fn snapshot_survives_serialization() {
        let mut character = knight();
        character.begin_dungeon_snapshot();
        character.take_damage(10);

        let json = serde_json::to_string(&character).expect("serialize");
        let back: Character = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, character);
        assert!(back.has_dungeon_snapshot());
    }
}
