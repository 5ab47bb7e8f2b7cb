//! Run aggregate: one attempt at a dungeon.
//!
//! The run owns its encounter sequence and the counters that walk it.
//! Encounter order is derived from the counters alone:
//!
//! 1. a revealed, undefeated final boss is always next
//! 2. otherwise the next mini-boss, once its phase of monsters is cleared
//! 3. otherwise the final boss, once every monster and mini-boss is down
//! 4. otherwise the next monster
//! 5. otherwise nothing: the run is finished
//!
//! Monsters are split into `mini_bosses + 1` phases of `ceil(M / (B + 1))`.
//! The k-th mini-boss guards the end of phase k.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{reward::merge_item, Encounter, EncounterKind, RewardInfo, RewardItem};
use crate::error::DomainError;
use crate::events::VictoryOutcome;
use crate::ids::{CharacterId, DungeonId};
use crate::value_objects::Progress;

/// Position of an encounter inside a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncounterSlot {
    Monster(usize),
    MiniBoss(usize),
    FinalBoss,
}

impl EncounterSlot {
    pub fn kind(self) -> EncounterKind {
        match self {
            EncounterSlot::Monster(_) => EncounterKind::Normal,
            EncounterSlot::MiniBoss(_) => EncounterKind::MiniBoss,
            EncounterSlot::FinalBoss => EncounterKind::FinalBoss,
        }
    }
}

/// Result of encounter selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextEncounter {
    pub slot: EncounterSlot,
    /// True only on the selection that first revealed the final boss.
    pub revealed_final_boss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    dungeon_id: DungeonId,
    dungeon_name: String,
    #[serde(default)]
    party: Vec<CharacterId>,
    monsters: Vec<Encounter>,
    mini_bosses: Vec<Encounter>,
    final_boss: Option<Encounter>,
    current_monster_index: usize,
    defeated_monsters: usize,
    defeated_mini_bosses: usize,
    final_boss_appeared: bool,
    is_completed: bool,
    progress: Progress,
    #[serde(default)]
    rewards: Vec<RewardItem>,
    #[serde(default)]
    experience_gained: u64,
    started_at: DateTime<Utc>,
}

impl Run {
    pub fn new(
        dungeon_id: DungeonId,
        dungeon_name: impl Into<String>,
        party: Vec<CharacterId>,
        monsters: Vec<Encounter>,
        mini_bosses: Vec<Encounter>,
        final_boss: Option<Encounter>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if dungeon_id.is_empty() {
            return Err(DomainError::validation("Run requires a dungeon id"));
        }
        if party.is_empty() {
            return Err(DomainError::validation(
                "A run needs at least one participant",
            ));
        }
        if let Some(bad) = monsters.iter().find(|m| m.kind() != EncounterKind::Normal) {
            return Err(DomainError::validation(format!(
                "'{}' is a boss and cannot fill a monster slot",
                bad.name
            )));
        }
        if let Some(bad) = mini_bosses
            .iter()
            .find(|m| m.kind() != EncounterKind::MiniBoss)
        {
            return Err(DomainError::validation(format!(
                "'{}' is not flagged as a mini-boss",
                bad.name
            )));
        }
        if let Some(boss) = final_boss.as_ref() {
            if boss.kind() != EncounterKind::FinalBoss {
                return Err(DomainError::validation(format!(
                    "'{}' is not flagged as a final boss",
                    boss.name
                )));
            }
        }

        Ok(Self {
            dungeon_id,
            dungeon_name: dungeon_name.into(),
            party,
            monsters,
            mini_bosses,
            final_boss,
            current_monster_index: 0,
            defeated_monsters: 0,
            defeated_mini_bosses: 0,
            final_boss_appeared: false,
            is_completed: false,
            progress: Progress::default(),
            rewards: Vec::new(),
            experience_gained: 0,
            started_at,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn dungeon_id(&self) -> &DungeonId {
        &self.dungeon_id
    }

    #[inline]
    pub fn dungeon_name(&self) -> &str {
        &self.dungeon_name
    }

    #[inline]
    pub fn party(&self) -> &[CharacterId] {
        &self.party
    }

    #[inline]
    pub fn monsters(&self) -> &[Encounter] {
        &self.monsters
    }

    #[inline]
    pub fn mini_bosses(&self) -> &[Encounter] {
        &self.mini_bosses
    }

    #[inline]
    pub fn final_boss(&self) -> Option<&Encounter> {
        self.final_boss.as_ref()
    }

    #[inline]
    pub fn current_monster_index(&self) -> usize {
        self.current_monster_index
    }

    #[inline]
    pub fn defeated_monsters(&self) -> usize {
        self.defeated_monsters
    }

    #[inline]
    pub fn defeated_mini_bosses(&self) -> usize {
        self.defeated_mini_bosses
    }

    #[inline]
    pub fn final_boss_appeared(&self) -> bool {
        self.final_boss_appeared
    }

    /// True once the final boss has been defeated.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    #[inline]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[inline]
    pub fn rewards(&self) -> &[RewardItem] {
        &self.rewards
    }

    #[inline]
    pub fn experience_gained(&self) -> u64 {
        self.experience_gained
    }

    #[inline]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn total_encounters(&self) -> usize {
        self.monsters.len() + self.mini_bosses.len() + usize::from(self.final_boss.is_some())
    }

    pub fn defeated_encounters(&self) -> usize {
        self.current_monster_index + self.defeated_mini_bosses + usize::from(self.is_completed)
    }

    /// Monsters per phase; at least one so an empty monster list still
    /// lets mini-bosses through.
    pub fn phase_size(&self) -> usize {
        let phases = self.mini_bosses.len() + 1;
        self.monsters.len().div_ceil(phases).max(1)
    }

    pub fn encounter(&self, slot: EncounterSlot) -> Option<&Encounter> {
        match slot {
            EncounterSlot::Monster(index) => self.monsters.get(index),
            EncounterSlot::MiniBoss(index) => self.mini_bosses.get(index),
            EncounterSlot::FinalBoss => self.final_boss.as_ref(),
        }
    }

    pub fn encounter_mut(&mut self, slot: EncounterSlot) -> Option<&mut Encounter> {
        match slot {
            EncounterSlot::Monster(index) => self.monsters.get_mut(index),
            EncounterSlot::MiniBoss(index) => self.mini_bosses.get_mut(index),
            EncounterSlot::FinalBoss => self.final_boss.as_mut(),
        }
    }

    // =========================================================================
    // Encounter selection
    // =========================================================================

    /// Next encounter without side effects.
    pub fn peek_next(&self) -> Option<EncounterSlot> {
        if self.is_completed {
            return None;
        }
        if self.final_boss_appeared {
            return self.final_boss.as_ref().map(|_| EncounterSlot::FinalBoss);
        }
        if self.mini_boss_due() {
            return Some(EncounterSlot::MiniBoss(self.defeated_mini_bosses));
        }
        if self.minor_encounters_cleared() && self.final_boss.is_some() {
            return Some(EncounterSlot::FinalBoss);
        }
        if self.current_monster_index < self.monsters.len() {
            return Some(EncounterSlot::Monster(self.current_monster_index));
        }
        None
    }

    /// Selects the next encounter. Revealing the final boss is sticky: the
    /// flag stays set until the run ends.
    pub fn select_next(&mut self) -> Option<NextEncounter> {
        let slot = self.peek_next()?;
        let revealed_final_boss = slot == EncounterSlot::FinalBoss && !self.final_boss_appeared;
        if revealed_final_boss {
            self.final_boss_appeared = true;
        }
        Some(NextEncounter {
            slot,
            revealed_final_boss,
        })
    }

    fn mini_boss_due(&self) -> bool {
        let next = self.defeated_mini_bosses;
        if next >= self.mini_bosses.len() {
            return false;
        }
        let quota = (self.phase_size() * (next + 1)).min(self.monsters.len());
        self.current_monster_index >= quota
    }

    fn minor_encounters_cleared(&self) -> bool {
        self.current_monster_index >= self.monsters.len()
            && self.defeated_mini_bosses >= self.mini_bosses.len()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Advances the counters past a defeated encounter.
    pub fn record_victory(&mut self, slot: EncounterSlot) -> Result<VictoryOutcome, DomainError> {
        match slot {
            EncounterSlot::Monster(index) => {
                if index != self.current_monster_index || index >= self.monsters.len() {
                    return Err(DomainError::invalid_state_transition(format!(
                        "Monster {} is not the current monster ({})",
                        index, self.current_monster_index
                    )));
                }
                self.current_monster_index += 1;
                self.defeated_monsters = self.current_monster_index;
            }
            EncounterSlot::MiniBoss(index) => {
                if index != self.defeated_mini_bosses || index >= self.mini_bosses.len() {
                    return Err(DomainError::invalid_state_transition(format!(
                        "Mini-boss {} is not the next mini-boss ({})",
                        index, self.defeated_mini_bosses
                    )));
                }
                self.defeated_mini_bosses += 1;
            }
            EncounterSlot::FinalBoss => {
                if !self.final_boss_appeared || self.final_boss.is_none() || self.is_completed {
                    return Err(DomainError::invalid_state_transition(
                        "Final boss cannot be defeated before it appears",
                    ));
                }
                self.is_completed = true;
            }
        }

        let progress = self.recompute_progress();
        Ok(VictoryOutcome {
            kind: slot.kind(),
            progress,
            final_boss_defeated: slot == EncounterSlot::FinalBoss,
        })
    }

    pub fn recompute_progress(&mut self) -> Progress {
        self.progress =
            Progress::from_counts(self.defeated_encounters(), self.total_encounters());
        self.progress
    }

    /// Appends a victory's payout to the run ledger.
    pub fn add_rewards(&mut self, reward: &RewardInfo) {
        self.experience_gained = self.experience_gained.saturating_add(reward.exp);
        for item in &reward.items {
            merge_item(&mut self.rewards, item.item_id.clone(), item.count);
        }
    }

    // =========================================================================
    // Integrity
    // =========================================================================

    /// Re-derives `defeated_monsters` from the authoritative index.
    /// Returns true if the stored value disagreed.
    pub fn align_counters(&mut self) -> bool {
        let drifted = self.defeated_monsters != self.current_monster_index;
        self.defeated_monsters = self.current_monster_index;
        drifted
    }

    /// Checks the structural invariants of a run, e.g. after loading it.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.dungeon_id.is_empty() {
            return Err(DomainError::validation("Run has no dungeon id"));
        }
        if self.party.is_empty() {
            return Err(DomainError::validation("Run has no participants"));
        }
        if self.current_monster_index > self.monsters.len() {
            return Err(DomainError::constraint(format!(
                "Monster index {} exceeds {} monsters",
                self.current_monster_index,
                self.monsters.len()
            )));
        }
        if self.defeated_mini_bosses > self.mini_bosses.len() {
            return Err(DomainError::constraint(format!(
                "{} mini-bosses defeated out of {}",
                self.defeated_mini_bosses,
                self.mini_bosses.len()
            )));
        }
        if self.final_boss_appeared && self.final_boss.is_none() {
            return Err(DomainError::constraint(
                "Final boss appeared but the run has none",
            ));
        }
        if self.final_boss_appeared && !self.minor_encounters_cleared() {
            return Err(DomainError::constraint(
                "Final boss appeared before all other encounters were cleared",
            ));
        }
        if self.is_completed && !self.final_boss_appeared {
            return Err(DomainError::constraint(
                "Run is completed but the final boss never appeared",
            ));
        }
        Ok(())
    }
}
