use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{EncounterId, TemplateId};
use crate::value_objects::{CombatStats, DifficultyProfile, Element};

use super::CreatureTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EncounterKind {
    Normal,
    MiniBoss,
    FinalBoss,
}

impl EncounterKind {
    pub fn label(&self) -> &'static str {
        match self {
            EncounterKind::Normal => "monster",
            EncounterKind::MiniBoss => "mini-boss",
            EncounterKind::FinalBoss => "final boss",
        }
    }
}

impl fmt::Display for EncounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A concrete opponent spawned into a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    pub id: EncounterId,
    pub template_id: TemplateId,
    pub name: String,
    pub attribute: Element,
    pub base_stats: CombatStats,
    pub current_stats: CombatStats,
    pub is_boss: bool,
    pub is_mini_boss: bool,
    pub is_final_boss: bool,
    pub xp_reward: u64,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl Encounter {
    /// Instantiates a template at the given difficulty.
    pub fn spawn(
        id: EncounterId,
        template: &CreatureTemplate,
        kind: EncounterKind,
        attribute: Element,
        profile: &DifficultyProfile,
    ) -> Self {
        let stats = template.base_stats().scaled(&profile.stat_multiplier);
        Self {
            id,
            template_id: template.id.clone(),
            name: template.name.clone(),
            attribute,
            base_stats: stats,
            current_stats: stats,
            is_boss: kind != EncounterKind::Normal,
            is_mini_boss: kind == EncounterKind::MiniBoss,
            is_final_boss: kind == EncounterKind::FinalBoss,
            xp_reward: profile.scale_reward(template.xp_reward),
            skills: template.skills.clone(),
        }
    }

    pub fn kind(&self) -> EncounterKind {
        if self.is_final_boss {
            EncounterKind::FinalBoss
        } else if self.is_mini_boss {
            EncounterKind::MiniBoss
        } else {
            EncounterKind::Normal
        }
    }

    #[inline]
    pub fn max_hp(&self) -> u32 {
        self.base_stats.max_hp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::DifficultyType;

    fn goblin_chief() -> CreatureTemplate {
        CreatureTemplate::new("goblinChief", "Goblin Chief", (500, 30, 15), Element::Earth, 300)
            .with_skills(&["rally"])
    }

    #[test]
    fn spawn_scales_stats_and_experience() {
        let profile = DifficultyType::Elite.profile();
        let encounter = Encounter::spawn(
            EncounterId::new(),
            &goblin_chief(),
            EncounterKind::MiniBoss,
            Element::Earth,
            &profile,
        );

        assert_eq!(encounter.current_stats.hp, 1000);
        assert_eq!(encounter.current_stats.attack, 60);
        assert_eq!(encounter.xp_reward, 450);
        assert_eq!(encounter.skills, vec!["rally".to_string()]);
    }

    #[test]
    fn flags_follow_kind() {
        let profile = DifficultyType::Normal.profile();
        let template = goblin_chief();

        let mini = Encounter::spawn(
            EncounterId::new(),
            &template,
            EncounterKind::MiniBoss,
            Element::Earth,
            &profile,
        );
        assert!(mini.is_boss && mini.is_mini_boss && !mini.is_final_boss);
        assert_eq!(mini.kind(), EncounterKind::MiniBoss);

        let normal = Encounter::spawn(
            EncounterId::new(),
            &template,
            EncounterKind::Normal,
            Element::Earth,
            &profile,
        );
        assert!(!normal.is_boss);
        assert_eq!(normal.kind(), EncounterKind::Normal);
    }
}
