//! Reference combat resolver.
//!
//! A compact turn loop: each living member strikes in speed order, with
//! crit and multi-attack rolls, then the enemy hits one random living
//! member. The real battle system plugs in through the same port.

use std::sync::Arc;

use delve_domain::{
    BattleStatistics, Character, CharacterStats, Encounter, MemberBattleStats, Team,
};

use crate::infrastructure::ports::{
    CharacterRegistry, CombatError, CombatResolver, CombatResult, RandomPort,
};

const CRIT_MULTIPLIER: f64 = 1.5;
const FRONT_LINE: usize = 4;

pub struct AutoBattleResolver {
    characters: Arc<dyn CharacterRegistry>,
    random: Arc<dyn RandomPort>,
    max_turns: u32,
}

impl AutoBattleResolver {
    pub const DEFAULT_MAX_TURNS: u32 = 50;

    pub fn new(characters: Arc<dyn CharacterRegistry>, random: Arc<dyn RandomPort>) -> Self {
        Self {
            characters,
            random,
            max_turns: Self::DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    fn load_front_line(&self, team: &Team) -> Result<Vec<Character>, CombatError> {
        let mut fighters = Vec::new();
        for id in team.members.iter().take(FRONT_LINE) {
            match self.characters.get_character(*id) {
                Ok(Some(character)) => fighters.push(character),
                Ok(None) => tracing::warn!(character_id = %id, "Team member not found, skipping"),
                Err(e) => return Err(CombatError::Failed(e.to_string())),
            }
        }
        if fighters.is_empty() {
            return Err(CombatError::Failed("team has no fighters".into()));
        }
        fighters.sort_by(|a, b| b.current_stats().speed.cmp(&a.current_stats().speed));
        Ok(fighters)
    }

    fn strike(&self, stats: &CharacterStats, defense: u32, tally: &mut MemberBattleStats) -> u32 {
        let hits = if self.random.gen_chance(stats.ta_rate) {
            tally.triple_attacks += 1;
            3
        } else if self.random.gen_chance(stats.da_rate) {
            tally.double_attacks += 1;
            2
        } else {
            1
        };

        let mut total = 0;
        for _ in 0..hits {
            let mut damage = f64::from(raw_damage(stats.attack, defense));
            if self.random.gen_chance(stats.crit_rate) {
                tally.critical_hits += 1;
                damage *= CRIT_MULTIPLIER;
            }
            total += damage.floor() as u32;
        }
        total
    }
}

fn raw_damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense / 2).max(1)
}

impl CombatResolver for AutoBattleResolver {
    fn resolve(
        &self,
        team: &Team,
        encounter: &mut Encounter,
    ) -> Result<CombatResult, CombatError> {
        let mut fighters = self.load_front_line(team)?;
        let mut tallies: Vec<MemberBattleStats> = fighters
            .iter()
            .map(|c| MemberBattleStats {
                character_id: c.id(),
                name: c.name().to_string(),
                is_alive: c.is_alive(),
                ..Default::default()
            })
            .collect();

        let mut turns = 0;
        let mut victory = false;
        while turns < self.max_turns {
            turns += 1;

            for (fighter, tally) in fighters.iter().zip(tallies.iter_mut()) {
                if !fighter.is_alive() {
                    continue;
                }
                let damage = self.strike(
                    fighter.current_stats(),
                    encounter.current_stats.defense,
                    tally,
                );
                tally.total_damage += u64::from(encounter.current_stats.take_damage(damage));
                if encounter.current_stats.is_defeated() {
                    victory = true;
                    break;
                }
            }
            if victory {
                break;
            }

            let alive: Vec<usize> = (0..fighters.len())
                .filter(|&i| fighters[i].is_alive())
                .collect();
            if alive.is_empty() {
                break;
            }
            let pick = self.random.gen_range(0, alive.len() as i32 - 1).max(0) as usize;
            let target = &mut fighters[alive[pick.min(alive.len() - 1)]];
            let damage = raw_damage(encounter.current_stats.attack, target.current_stats().defense);
            target.take_damage(damage);

            if fighters.iter().all(|f| !f.is_alive()) {
                break;
            }
        }

        for (fighter, tally) in fighters.iter().zip(tallies.iter_mut()) {
            tally.is_alive = fighter.is_alive();
            if let Err(e) = self.characters.save_character(fighter) {
                tracing::warn!(character_id = %fighter.id(), error = %e, "Failed to save fighter");
            }
        }

        tracing::debug!(
            encounter = %encounter.name,
            victory,
            turns,
            "Auto battle resolved"
        );

        Ok(CombatResult {
            victory,
            encounter_id: encounter.id,
            encounter_name: encounter.name.clone(),
            team_members: team.members.clone(),
            statistics: BattleStatistics {
                turns,
                members: tallies,
            },
        })
    }
}
