//! Run generation: turns a dungeon template into a concrete run.

use std::sync::Arc;

use delve_domain::{
    CharacterId, CreatureTemplate, DifficultyProfile, DungeonId, Element, Encounter, EncounterId,
    EncounterKind, Run, TemplateId,
};

use crate::entities::{TemplateSource, TemplateStore};
use crate::infrastructure::ports::{ClockPort, RandomPort};

use super::error::DungeonError;

/// How many encounters were built from fallback creatures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FallbackReport {
    pub monsters: u32,
    pub bosses: u32,
}

impl FallbackReport {
    pub fn used(&self) -> bool {
        self.monsters > 0 || self.bosses > 0
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedRun {
    pub run: Run,
    pub fallback: FallbackReport,
}

pub struct RunGenerator {
    templates: Arc<TemplateStore>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
}

impl RunGenerator {
    pub fn new(
        templates: Arc<TemplateStore>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            templates,
            random,
            clock,
        }
    }

    pub fn templates(&self) -> &Arc<TemplateStore> {
        &self.templates
    }

    /// Builds a fresh run. Same random sequence, same run.
    pub fn generate(
        &self,
        dungeon_id: &DungeonId,
        party: Vec<CharacterId>,
    ) -> Result<GeneratedRun, DungeonError> {
        let template = self
            .templates
            .dungeon(dungeon_id)
            .ok_or_else(|| DungeonError::TemplateNotFound(dungeon_id.clone()))?;
        let profile = self.templates.difficulty(template.difficulty);
        let mut report = FallbackReport::default();

        let range = template.monster_count_range();
        let monster_count = self.roll(range.min, range.max);

        let monster_pool = if template.possible_monsters.is_empty() {
            tracing::warn!(dungeon_id = %dungeon_id, "Monster pool empty, using fallback monsters");
            self.templates.fallback_monster_pool()
        } else {
            template.possible_monsters.clone()
        };
        let monsters = (0..monster_count)
            .map(|_| self.spawn(&monster_pool, EncounterKind::Normal, &profile, &mut report))
            .collect();

        let mini_pool = if template.possible_mini_bosses.is_empty() {
            self.templates.fallback_mini_boss_pool()
        } else {
            template.possible_mini_bosses.clone()
        };
        let mini_bosses = (0..template.mini_boss_count)
            .map(|_| self.spawn(&mini_pool, EncounterKind::MiniBoss, &profile, &mut report))
            .collect();

        // No final boss pool means a boss-less run, not a fallback boss.
        let final_boss = if template.possible_final_bosses.is_empty() {
            None
        } else {
            Some(self.spawn(
                &template.possible_final_bosses,
                EncounterKind::FinalBoss,
                &profile,
                &mut report,
            ))
        };

        let run = Run::new(
            template.id.clone(),
            template.name.clone(),
            party,
            monsters,
            mini_bosses,
            final_boss,
            self.clock.now(),
        )?;

        if report.used() {
            tracing::warn!(
                dungeon_id = %dungeon_id,
                fallback_monsters = report.monsters,
                fallback_bosses = report.bosses,
                "Run generated with fallback creatures"
            );
        }
        tracing::info!(
            dungeon_id = %dungeon_id,
            difficulty = profile.label,
            monsters = run.monsters().len(),
            mini_bosses = run.mini_bosses().len(),
            has_final_boss = run.final_boss().is_some(),
            "Run generated"
        );

        Ok(GeneratedRun {
            run,
            fallback: report,
        })
    }

    fn roll(&self, min: u32, max: u32) -> u32 {
        let min_i = i32::try_from(min).unwrap_or(i32::MAX);
        let max_i = i32::try_from(max).unwrap_or(i32::MAX);
        self.random.gen_range(min_i, max_i).clamp(min_i, max_i.max(min_i)) as u32
    }

    fn pick<'a>(&self, pool: &'a [TemplateId]) -> Option<&'a TemplateId> {
        let last = pool.len().checked_sub(1)? as u32;
        pool.get(self.roll(0, last) as usize)
    }

    fn spawn(
        &self,
        pool: &[TemplateId],
        kind: EncounterKind,
        profile: &DifficultyProfile,
        report: &mut FallbackReport,
    ) -> Encounter {
        let (template, source) = self.resolve(pool, kind);
        if source == TemplateSource::Fallback {
            match kind {
                EncounterKind::Normal => report.monsters += 1,
                _ => report.bosses += 1,
            }
        }

        let attribute = template.attribute.unwrap_or_else(|| {
            let last = Element::ALL.len() as u32 - 1;
            Element::from_index(self.roll(0, last) as usize)
        });

        Encounter::spawn(
            EncounterId::from_uuid(self.random.gen_uuid()),
            &template,
            kind,
            attribute,
            profile,
        )
    }

    /// Looks the chosen id up in the right table; unknown ids degrade to a
    /// random fallback creature of the same class.
    fn resolve(
        &self,
        pool: &[TemplateId],
        kind: EncounterKind,
    ) -> (CreatureTemplate, TemplateSource) {
        if let Some(id) = self.pick(pool) {
            let found = match kind {
                EncounterKind::Normal => self.templates.monster(id),
                _ => self.templates.boss(id),
            };
            if let Some((template, source)) = found {
                return (template.clone(), source);
            }
            tracing::warn!(
                template_id = %id,
                kind = %kind,
                "Unknown creature template, substituting fallback"
            );
        }

        let fallback_pool = match kind {
            EncounterKind::Normal => self.templates.fallback_monster_pool(),
            EncounterKind::MiniBoss => self.templates.fallback_mini_boss_pool(),
            EncounterKind::FinalBoss => self.templates.fallback_final_boss_pool(),
        };
        let fallback = self.pick(&fallback_pool).and_then(|id| match kind {
            EncounterKind::Normal => self.templates.fallback_monster(id),
            _ => self.templates.fallback_boss(id),
        });
        match fallback {
            Some(template) => (template.clone(), TemplateSource::Fallback),
            None => (
                CreatureTemplate::new("wisp", "Lost Wisp", (1, 1, 0), Element::Light, 0),
                TemplateSource::Fallback,
            ),
        }
    }
}
