use serde::{Deserialize, Serialize};

use crate::ids::TemplateId;
use crate::value_objects::{CombatStats, Element};

/// Static definition of a monster or boss.
///
/// Monster and boss tables share this shape; bosses usually carry skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatureTemplate {
    /// Filled from the table key when a data file omits it.
    #[serde(default)]
    pub id: TemplateId,
    pub name: String,
    pub hp: u32,
    #[serde(alias = "attack")]
    pub atk: u32,
    #[serde(alias = "defense")]
    pub def: u32,
    #[serde(default)]
    pub attribute: Option<Element>,
    #[serde(default, alias = "exp")]
    pub xp_reward: u64,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreatureTemplate {
    pub fn new(
        id: impl Into<TemplateId>,
        name: impl Into<String>,
        stats: (u32, u32, u32),
        attribute: Element,
        xp_reward: u64,
    ) -> Self {
        let (hp, atk, def) = stats;
        Self {
            id: id.into(),
            name: name.into(),
            hp,
            atk,
            def,
            attribute: Some(attribute),
            xp_reward,
            skills: Vec::new(),
        }
    }

    pub fn with_skills(mut self, skills: &[&str]) -> Self {
        self.skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn base_stats(&self) -> CombatStats {
        CombatStats::new(self.hp, self.atk, self.def)
    }
}
