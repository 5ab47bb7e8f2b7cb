//! Scripted combat and pacing doubles for runner tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use delve_domain::{
    BattleStatistics, Buff, Encounter, EncounterKind, MemberBattleStats, Team,
};

use crate::infrastructure::ports::{
    CharacterRegistry, CombatError, CombatResolver, CombatResult, PacingPort,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedBattle {
    Win,
    /// Loss where the first member dealt `damage` in total.
    Lose { damage: u64 },
    /// The resolver itself errors.
    Fail,
    /// Claims victory but leaves the encounter standing.
    FalseVictory,
}

/// Plays back a script of battle results. Once the script runs out every
/// battle is won.
pub struct ScriptedCombat {
    script: Mutex<VecDeque<ScriptedBattle>>,
    fought: Mutex<Vec<EncounterKind>>,
    wounds: Option<(Arc<dyn CharacterRegistry>, u32)>,
}

impl ScriptedCombat {
    pub fn always_win() -> Self {
        Self::scripted([])
    }

    pub fn scripted(battles: impl IntoIterator<Item = ScriptedBattle>) -> Self {
        Self {
            script: Mutex::new(battles.into_iter().collect()),
            fought: Mutex::new(Vec::new()),
            wounds: None,
        }
    }

    /// Every battle also wounds and buffs each party member, the way a real
    /// battle leaves run-local marks on the roster.
    pub fn wounding(mut self, characters: Arc<dyn CharacterRegistry>, amount: u32) -> Self {
        self.wounds = Some((characters, amount));
        self
    }

    /// Kinds of every encounter fought, in order.
    pub fn fought(&self) -> Vec<EncounterKind> {
        self.fought.lock().expect("fought lock").clone()
    }

    fn wound(&self, team: &Team) {
        let Some((characters, amount)) = self.wounds.as_ref() else {
            return;
        };
        for member in &team.members {
            let mut character = characters
                .get_character(*member)
                .expect("registry available")
                .expect("party member exists");
            character.take_damage(*amount);
            character.add_buff(Buff {
                name: "battle_fervor".to_string(),
                remaining_turns: 3,
            });
            characters
                .save_character(&character)
                .expect("save wounded member");
        }
    }
}

impl CombatResolver for ScriptedCombat {
    fn resolve(
        &self,
        team: &Team,
        encounter: &mut Encounter,
    ) -> Result<CombatResult, CombatError> {
        let battle = self
            .script
            .lock()
            .expect("script lock")
            .pop_front()
            .unwrap_or(ScriptedBattle::Win);
        self.fought.lock().expect("fought lock").push(encounter.kind());
        self.wound(team);

        let (victory, damage) = match battle {
            ScriptedBattle::Win => {
                let hp = encounter.current_stats.hp;
                (true, u64::from(encounter.current_stats.take_damage(hp)))
            }
            ScriptedBattle::Lose { damage } => (false, damage),
            ScriptedBattle::FalseVictory => (true, 0),
            ScriptedBattle::Fail => {
                return Err(CombatError::Failed("scripted resolver failure".to_string()))
            }
        };

        let members = team
            .members
            .iter()
            .enumerate()
            .map(|(index, id)| MemberBattleStats {
                character_id: *id,
                name: format!("member-{}", index),
                total_damage: if index == 0 { damage } else { 0 },
                is_alive: victory,
                ..Default::default()
            })
            .collect();

        Ok(CombatResult {
            victory,
            encounter_id: encounter.id,
            encounter_name: encounter.name.clone(),
            team_members: team.members.clone(),
            statistics: BattleStatistics { turns: 3, members },
        })
    }
}

/// Pacer that parks on every beat until the test releases it, or lets
/// everything through once opened.
#[derive(Default)]
pub struct GatedPacer {
    entered: Notify,
    release: Notify,
    open: AtomicBool,
}

impl GatedPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until a driver is parked on a beat.
    pub async fn wait_for_beat(&self) {
        self.entered.notified().await;
    }

    /// Lets one parked (or the next) beat through.
    pub fn release_one(&self) {
        self.release.notify_one();
    }

    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.release.notify_waiters();
        self.release.notify_one();
    }
}

#[async_trait]
impl PacingPort for GatedPacer {
    async fn pause(&self, _beat: EncounterKind) {
        if self.open.load(Ordering::SeqCst) {
            return;
        }
        self.entered.notify_one();
        self.release.notified().await;
    }
}
