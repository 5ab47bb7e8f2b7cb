//! Template store: dungeon definitions, creature tables and scaling.
//!
//! Creature tables normally come from data files. When a table is missing
//! or a dungeon references an unknown creature, the built-in fallback
//! creatures stand in so a run can always be generated.

use std::collections::BTreeMap;

use delve_domain::{
    BaseRewards, ChestDrop, ChestTier, CreatureTemplate, DifficultyProfile, DifficultyType,
    DropKind, DungeonId, DungeonTemplate, Element, ItemId, TemplateId,
};

/// Where a creature template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    Loaded,
    Fallback,
}

pub struct TemplateStore {
    dungeons: BTreeMap<DungeonId, DungeonTemplate>,
    monsters: BTreeMap<TemplateId, CreatureTemplate>,
    bosses: BTreeMap<TemplateId, CreatureTemplate>,
    fallback_monsters: BTreeMap<TemplateId, CreatureTemplate>,
    fallback_bosses: BTreeMap<TemplateId, CreatureTemplate>,
}

impl TemplateStore {
    pub fn new(
        dungeons: impl IntoIterator<Item = DungeonTemplate>,
        monsters: BTreeMap<TemplateId, CreatureTemplate>,
        bosses: BTreeMap<TemplateId, CreatureTemplate>,
    ) -> Self {
        Self {
            dungeons: dungeons
                .into_iter()
                .map(|dungeon| (dungeon.id.clone(), dungeon))
                .collect(),
            monsters,
            bosses,
            fallback_monsters: keyed(fallback_monsters()),
            fallback_bosses: keyed(fallback_bosses()),
        }
    }

    /// Built-in dungeons with no creature tables loaded; every creature
    /// resolves through the fallback tables.
    pub fn builtin() -> Self {
        Self::new(builtin_dungeons(), BTreeMap::new(), BTreeMap::new())
    }

    // =========================================================================
    // Dungeons
    // =========================================================================

    pub fn dungeon(&self, id: &DungeonId) -> Option<&DungeonTemplate> {
        self.dungeons.get(id)
    }

    /// Dungeons ordered by level, then id.
    pub fn dungeons(&self) -> Vec<&DungeonTemplate> {
        let mut all: Vec<&DungeonTemplate> = self.dungeons.values().collect();
        all.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.id.cmp(&b.id)));
        all
    }

    /// The entry dungeon: unlocked from the start.
    pub fn first_dungeon(&self) -> Option<&DungeonTemplate> {
        self.dungeons().into_iter().next()
    }

    pub fn difficulty(&self, kind: DifficultyType) -> DifficultyProfile {
        kind.profile()
    }

    // =========================================================================
    // Creatures
    // =========================================================================

    pub fn monster(&self, id: &TemplateId) -> Option<(&CreatureTemplate, TemplateSource)> {
        lookup(&self.monsters, &self.fallback_monsters, id)
    }

    pub fn boss(&self, id: &TemplateId) -> Option<(&CreatureTemplate, TemplateSource)> {
        lookup(&self.bosses, &self.fallback_bosses, id)
    }

    pub fn monster_table_loaded(&self) -> bool {
        !self.monsters.is_empty()
    }

    pub fn boss_table_loaded(&self) -> bool {
        !self.bosses.is_empty()
    }

    pub fn fallback_monster_pool(&self) -> Vec<TemplateId> {
        self.fallback_monsters.keys().cloned().collect()
    }

    pub fn fallback_mini_boss_pool(&self) -> Vec<TemplateId> {
        FALLBACK_MINI_BOSSES.iter().map(|id| TemplateId::from(*id)).collect()
    }

    pub fn fallback_final_boss_pool(&self) -> Vec<TemplateId> {
        FALLBACK_FINAL_BOSSES
            .iter()
            .map(|id| TemplateId::from(*id))
            .collect()
    }

    pub fn fallback_monster(&self, id: &TemplateId) -> Option<&CreatureTemplate> {
        self.fallback_monsters.get(id)
    }

    pub fn fallback_boss(&self, id: &TemplateId) -> Option<&CreatureTemplate> {
        self.fallback_bosses.get(id)
    }
}

/// An empty loaded table means the data file never arrived: everything
/// comes from the fallback table.
fn lookup<'a>(
    loaded: &'a BTreeMap<TemplateId, CreatureTemplate>,
    fallback: &'a BTreeMap<TemplateId, CreatureTemplate>,
    id: &TemplateId,
) -> Option<(&'a CreatureTemplate, TemplateSource)> {
    if loaded.is_empty() {
        return fallback.get(id).map(|t| (t, TemplateSource::Fallback));
    }
    loaded.get(id).map(|t| (t, TemplateSource::Loaded))
}

fn keyed(templates: Vec<CreatureTemplate>) -> BTreeMap<TemplateId, CreatureTemplate> {
    templates.into_iter().map(|t| (t.id.clone(), t)).collect()
}

// =============================================================================
// Fallback creatures
// =============================================================================

const FALLBACK_MINI_BOSSES: [&str; 2] = ["goblinChief", "skeletonKing"];
const FALLBACK_FINAL_BOSSES: [&str; 1] = ["forestGuardian"];

pub fn fallback_monsters() -> Vec<CreatureTemplate> {
    vec![
        CreatureTemplate::new("slime", "Slime", (100, 10, 5), Element::Water, 50),
        CreatureTemplate::new("goblin", "Goblin", (150, 15, 8), Element::Earth, 80),
        CreatureTemplate::new("wolf", "Wolf", (120, 20, 3), Element::Wind, 70),
    ]
}

pub fn fallback_bosses() -> Vec<CreatureTemplate> {
    vec![
        CreatureTemplate::new(
            "goblinChief",
            "Goblin Chief",
            (500, 30, 15),
            Element::Earth,
            300,
        )
        .with_skills(&["war_cry"]),
        CreatureTemplate::new(
            "skeletonKing",
            "Skeleton King",
            (600, 35, 10),
            Element::Dark,
            350,
        )
        .with_skills(&["bone_shield"]),
        CreatureTemplate::new(
            "forestGuardian",
            "Forest Guardian",
            (1000, 50, 20),
            Element::Earth,
            800,
        )
        .with_skills(&["root_bind", "regrowth"]),
    ]
}

// =============================================================================
// Built-in dungeons
// =============================================================================

fn drops(entries: &[(&str, DropKind, f64)]) -> Vec<ChestDrop> {
    entries
        .iter()
        .map(|(id, kind, rate)| ChestDrop {
            item_id: ItemId::from(*id),
            kind: *kind,
            rate: *rate,
        })
        .collect()
}

fn ids(values: &[&str]) -> Vec<TemplateId> {
    values.iter().map(|v| TemplateId::from(*v)).collect()
}

struct DungeonSeed {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    level: u32,
    monsters: [&'static str; 3],
    mini_bosses: [&'static str; 2],
    final_boss: &'static str,
    rewards: BaseRewards,
    silver: [(&'static str, DropKind, f64); 4],
    gold: [(&'static str, DropKind, f64); 8],
    next: Option<&'static str>,
}

impl DungeonSeed {
    fn build(self) -> DungeonTemplate {
        let mut chest_drops = BTreeMap::new();
        chest_drops.insert(ChestTier::Silver, drops(&self.silver));
        chest_drops.insert(ChestTier::Gold, drops(&self.gold));

        DungeonTemplate {
            id: DungeonId::from(self.id),
            name: self.name.to_string(),
            description: self.description.to_string(),
            level: self.level,
            difficulty: DifficultyType::Normal,
            monster_count: None,
            mini_boss_count: 2,
            possible_monsters: ids(&self.monsters),
            possible_mini_bosses: ids(&self.mini_bosses),
            possible_final_bosses: ids(&[self.final_boss]),
            rewards: self.rewards,
            chest_drops,
            next_dungeon: self.next.map(DungeonId::from),
        }
    }
}

pub fn builtin_dungeons() -> Vec<DungeonTemplate> {
    use DropKind::{Material, Weapon};

    vec![
        DungeonSeed {
            id: "forest_cave",
            name: "Forest Cave",
            description: "A mysterious cave in the forest, infested with weak monsters.",
            level: 1,
            monsters: ["slime", "goblin", "wolf"],
            mini_bosses: ["goblinChief", "skeletonKing"],
            final_boss: "forestGuardian",
            rewards: BaseRewards {
                gold: 5000,
                exp: 2000,
            },
            silver: [
                ("wood", Material, 0.4),
                ("stone", Material, 0.3),
                ("herbs", Material, 0.2),
                ("animalHide", Material, 0.1),
            ],
            gold: [
                ("forestSword", Weapon, 0.35),
                ("hunterAxe", Weapon, 0.3),
                ("guardianSpear", Weapon, 0.2),
                ("rangerBow", Weapon, 0.15),
                ("magicHerbs", Material, 0.4),
                ("crystal", Material, 0.3),
                ("beastFang", Material, 0.2),
                ("forestEssence", Material, 0.1),
            ],
            next: Some("mountain_path"),
        }
        .build(),
        DungeonSeed {
            id: "mountain_path",
            name: "Mountain Path",
            description: "A treacherous trail into the mountains, held by stronger monsters.",
            level: 2,
            monsters: ["mountainGoblin", "rockGolem", "iceWolf"],
            mini_bosses: ["mountainKing", "iceElemental"],
            final_boss: "mountainTitan",
            rewards: BaseRewards {
                gold: 10000,
                exp: 5000,
            },
            silver: [
                ("ironOre", Material, 0.4),
                ("crystal", Material, 0.3),
                ("iceCrystal", Material, 0.2),
                ("mountainHerbs", Material, 0.1),
            ],
            gold: [
                ("mountainSword", Weapon, 0.35),
                ("iceAxe", Weapon, 0.3),
                ("rockSpear", Weapon, 0.2),
                ("windBow", Weapon, 0.15),
                ("mountainCrystal", Material, 0.4),
                ("iceEssence", Material, 0.3),
                ("rockCore", Material, 0.2),
                ("windEssence", Material, 0.1),
            ],
            next: Some("ancient_ruins"),
        }
        .build(),
        DungeonSeed {
            id: "ancient_ruins",
            name: "Ancient Ruins",
            description: "Forgotten ruins hiding powerful magic and dangerous guardians.",
            level: 3,
            monsters: ["ancientGuardian", "ruinWalker", "magicConstruct"],
            mini_bosses: ["ruinKeeper", "magicMaster"],
            final_boss: "ancientDragon",
            rewards: BaseRewards {
                gold: 20000,
                exp: 10000,
            },
            silver: [
                ("ancientStone", Material, 0.4),
                ("magicCrystal", Material, 0.3),
                ("ruinFragment", Material, 0.2),
                ("ancientHerbs", Material, 0.1),
            ],
            gold: [
                ("ancientSword", Weapon, 0.35),
                ("magicStaff", Weapon, 0.3),
                ("ruinSpear", Weapon, 0.2),
                ("dragonBow", Weapon, 0.15),
                ("ancientCrystal", Material, 0.4),
                ("magicEssence", Material, 0.3),
                ("dragonScale", Material, 0.2),
                ("ancientEssence", Material, 0.1),
            ],
            next: None,
        }
        .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_chain_is_linked() {
        let store = TemplateStore::builtin();
        let order: Vec<&str> = store.dungeons().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(order, vec!["forest_cave", "mountain_path", "ancient_ruins"]);

        let forest = store.dungeon(&DungeonId::from("forest_cave")).expect("forest");
        assert_eq!(forest.next_dungeon, Some(DungeonId::from("mountain_path")));
        assert_eq!(forest.rewards.gold, 5000);
        assert_eq!(
            store.first_dungeon().map(|d| d.id.as_str()),
            Some("forest_cave")
        );
    }

    #[test]
    fn empty_tables_resolve_through_fallback() {
        let store = TemplateStore::builtin();
        let (slime, source) = store.monster(&TemplateId::from("slime")).expect("slime");
        assert_eq!(source, TemplateSource::Fallback);
        assert_eq!(slime.hp, 100);

        assert!(store.monster(&TemplateId::from("rockGolem")).is_none());
        assert!(!store.monster_table_loaded());
    }

    #[test]
    fn loaded_table_shadows_fallback() {
        let golem = CreatureTemplate::new("rockGolem", "Rock Golem", (400, 24, 30), Element::Earth, 180);
        let store = TemplateStore::new(
            builtin_dungeons(),
            keyed(vec![golem]),
            BTreeMap::new(),
        );

        let (found, source) = store.monster(&TemplateId::from("rockGolem")).expect("golem");
        assert_eq!(source, TemplateSource::Loaded);
        assert_eq!(found.name, "Rock Golem");
        assert!(store.monster(&TemplateId::from("slime")).is_none());
    }

    #[test]
    fn fallback_boss_pools_are_resolvable() {
        let store = TemplateStore::builtin();
        for id in store
            .fallback_mini_boss_pool()
            .iter()
            .chain(store.fallback_final_boss_pool().iter())
        {
            assert!(store.fallback_boss(id).is_some(), "missing {}", id);
        }
    }
}
