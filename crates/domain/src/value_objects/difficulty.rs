use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Difficulty class of a dungeon. Unknown values from data files fall back
/// to normal scaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyType {
    #[default]
    Normal,
    Elite,
    Boss,
    #[serde(other)]
    Unknown,
}

/// Inclusive count range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub fn new(min: u32, max: u32) -> Result<Self, DomainError> {
        if min > max {
            return Err(DomainError::validation(format!(
                "Count range minimum {} exceeds maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub const fn exactly(count: u32) -> Self {
        Self {
            min: count,
            max: count,
        }
    }

    /// Swaps inverted bounds instead of rejecting them; data files are lenient.
    pub fn normalized(self) -> Self {
        if self.min > self.max {
            Self {
                min: self.max,
                max: self.min,
            }
        } else {
            self
        }
    }
}

/// Per-stat scaling factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatMultiplier {
    pub hp: f64,
    pub attack: f64,
    pub defense: f64,
}

impl StatMultiplier {
    pub const fn uniform(factor: f64) -> Self {
        Self {
            hp: factor,
            attack: factor,
            defense: factor,
        }
    }
}

/// Scaling table entry for a difficulty class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub kind: DifficultyType,
    pub label: &'static str,
    pub monster_count: CountRange,
    pub stat_multiplier: StatMultiplier,
    pub reward_multiplier: f64,
}

impl DifficultyType {
    pub fn profile(self) -> DifficultyProfile {
        match self {
            DifficultyType::Normal | DifficultyType::Unknown => DifficultyProfile {
                kind: DifficultyType::Normal,
                label: "Normal",
                monster_count: CountRange { min: 10, max: 20 },
                stat_multiplier: StatMultiplier::uniform(1.0),
                reward_multiplier: 1.0,
            },
            DifficultyType::Elite => DifficultyProfile {
                kind: DifficultyType::Elite,
                label: "Elite",
                monster_count: CountRange { min: 30, max: 50 },
                stat_multiplier: StatMultiplier::uniform(2.0),
                reward_multiplier: 1.5,
            },
            DifficultyType::Boss => DifficultyProfile {
                kind: DifficultyType::Boss,
                label: "Boss",
                monster_count: CountRange::exactly(1),
                stat_multiplier: StatMultiplier::uniform(3.0),
                reward_multiplier: 2.0,
            },
        }
    }
}

impl DifficultyProfile {
    /// Experience after the reward multiplier, floored.
    pub fn scale_reward(&self, base: u64) -> u64 {
        (base as f64 * self.reward_multiplier).floor() as u64
    }
}
