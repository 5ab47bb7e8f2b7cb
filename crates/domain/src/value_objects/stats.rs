use serde::{Deserialize, Serialize};

use super::StatMultiplier;

/// Combat block of an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub max_hp: u32,
}

impl CombatStats {
    pub fn new(hp: u32, attack: u32, defense: u32) -> Self {
        Self {
            hp,
            attack,
            defense,
            max_hp: hp,
        }
    }

    /// Applies a difficulty multiplier, flooring each stat.
    pub fn scaled(&self, multiplier: &StatMultiplier) -> Self {
        let hp = scale(self.max_hp, multiplier.hp);
        Self {
            hp,
            attack: scale(self.attack, multiplier.attack),
            defense: scale(self.defense, multiplier.defense),
            max_hp: hp,
        }
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Subtracts damage, saturating at zero. Returns the damage actually dealt.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }
}

fn scale(value: u32, factor: f64) -> u32 {
    (f64::from(value) * factor).floor().max(0.0) as u32
}

/// Character stat block. Rates are probabilities in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStats {
    pub hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    pub crit_rate: f64,
    pub da_rate: f64,
    pub ta_rate: f64,
}

impl CharacterStats {
    pub const DEFAULT_CRIT_RATE: f64 = 0.05;
    pub const DEFAULT_DA_RATE: f64 = 0.15;
    pub const DEFAULT_TA_RATE: f64 = 0.05;

    pub fn new(max_hp: u32, attack: u32, defense: u32, speed: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            attack,
            defense,
            speed,
            crit_rate: Self::DEFAULT_CRIT_RATE,
            da_rate: Self::DEFAULT_DA_RATE,
            ta_rate: Self::DEFAULT_TA_RATE,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}
