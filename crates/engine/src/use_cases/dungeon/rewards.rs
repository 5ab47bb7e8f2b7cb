//! Victory rewards: experience for the team and chests for the inventory.

use std::sync::Arc;

use delve_domain::{ChestTier, Encounter, EncounterKind, RewardInfo, Team};

use crate::infrastructure::ports::{CharacterRegistry, InventorySink, RandomPort};

pub const MINI_BOSS_RAINBOW_CHANCE: f64 = 0.0005;
pub const FINAL_BOSS_RAINBOW_CHANCE: f64 = 0.02;

pub struct RewardProcessor {
    characters: Arc<dyn CharacterRegistry>,
    inventory: Arc<dyn InventorySink>,
    random: Arc<dyn RandomPort>,
}

impl RewardProcessor {
    pub fn new(
        characters: Arc<dyn CharacterRegistry>,
        inventory: Arc<dyn InventorySink>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            characters,
            inventory,
            random,
        }
    }

    /// Chest counts for a defeated encounter.
    ///
    /// - monster: one silver
    /// - mini-boss: 1-3 silver, 1-3 gold, rare rainbow
    /// - final boss: 1-3 gold, 1-3 red, rainbow at a better chance
    pub fn roll_chests(&self, kind: EncounterKind) -> Vec<(ChestTier, u32)> {
        let (first, second, rainbow_chance) = match kind {
            EncounterKind::Normal => return vec![(ChestTier::Silver, 1)],
            EncounterKind::MiniBoss => (ChestTier::Silver, ChestTier::Gold, MINI_BOSS_RAINBOW_CHANCE),
            EncounterKind::FinalBoss => (ChestTier::Gold, ChestTier::Red, FINAL_BOSS_RAINBOW_CHANCE),
        };

        let mut chests = vec![
            (first, self.random.gen_range(1, 3).clamp(1, 3) as u32),
            (second, self.random.gen_range(1, 3).clamp(1, 3) as u32),
        ];
        if self.random.gen_chance(rainbow_chance) {
            chests.push((ChestTier::Rainbow, 1));
        }
        chests
    }

    /// Grants experience to every team member and chests to the inventory.
    ///
    /// Failures are per item: a rejected chest or a missing character is
    /// logged and skipped, and only what was actually granted is returned.
    pub fn process(&self, encounter: &Encounter, team: &Team) -> RewardInfo {
        let mut reward = RewardInfo {
            exp: encounter.xp_reward,
            items: Vec::new(),
        };

        for member in &team.members {
            if let Err(e) = self.characters.add_experience(*member, encounter.xp_reward) {
                tracing::warn!(
                    character_id = %member,
                    exp = encounter.xp_reward,
                    error = %e,
                    "Failed to grant experience"
                );
            }
        }

        for (tier, count) in self.roll_chests(encounter.kind()) {
            let item_id = tier.item_id();
            for _ in 0..count {
                match self.inventory.add_item(&item_id, 1) {
                    Ok(()) => reward.add_item(item_id.clone(), 1),
                    Err(e) => tracing::warn!(
                        item_id = %item_id,
                        encounter = %encounter.name,
                        error = %e,
                        "Failed to grant chest"
                    ),
                }
            }
        }

        tracing::debug!(
            encounter = %encounter.name,
            exp = reward.exp,
            chests = reward.total_items(),
            "Rewards granted"
        );
        reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedRandom, SequenceRandom};
    use crate::infrastructure::memory::InMemoryInventory;
    use crate::infrastructure::ports::{
        InventoryError, MockCharacterRegistry, MockInventorySink, RegistryError,
    };
    use delve_domain::{
        CharacterId, CreatureTemplate, DifficultyType, Element, EncounterId, ItemId,
    };

    fn encounter(kind: EncounterKind) -> Encounter {
        let template = CreatureTemplate::new("goblin", "Goblin", (150, 15, 8), Element::Earth, 80);
        Encounter::spawn(
            EncounterId::new(),
            &template,
            kind,
            Element::Earth,
            &DifficultyType::Normal.profile(),
        )
    }

    fn accepting_registry(times: usize) -> MockCharacterRegistry {
        let mut registry = MockCharacterRegistry::new();
        registry
            .expect_add_experience()
            .times(times)
            .returning(|_, _| Ok(()));
        registry
    }

    #[test]
    fn monster_drops_one_silver_chest() {
        let inventory = Arc::new(InMemoryInventory::new());
        let processor = RewardProcessor::new(
            Arc::new(accepting_registry(2)),
            inventory.clone(),
            Arc::new(FixedRandom::highest().lucky()),
        );
        let team = Team::new("Party", vec![CharacterId::new(), CharacterId::new()]);

        let reward = processor.process(&encounter(EncounterKind::Normal), &team);
        assert_eq!(reward.exp, 80);
        assert_eq!(reward.count_of(&ItemId::from("silver_chest")), 1);
        assert_eq!(reward.total_items(), 1);
        assert_eq!(inventory.count(&ItemId::from("silver_chest")), 1);
    }

    #[test]
    fn mini_boss_chest_counts_stay_in_bounds() {
        let low = RewardProcessor::new(
            Arc::new(MockCharacterRegistry::new()),
            Arc::new(InMemoryInventory::new()),
            Arc::new(FixedRandom::lowest()),
        );
        assert_eq!(
            low.roll_chests(EncounterKind::MiniBoss),
            vec![(ChestTier::Silver, 1), (ChestTier::Gold, 1)]
        );

        let high = RewardProcessor::new(
            Arc::new(MockCharacterRegistry::new()),
            Arc::new(InMemoryInventory::new()),
            Arc::new(FixedRandom::highest().lucky()),
        );
        assert_eq!(
            high.roll_chests(EncounterKind::MiniBoss),
            vec![
                (ChestTier::Silver, 3),
                (ChestTier::Gold, 3),
                (ChestTier::Rainbow, 1)
            ]
        );
    }

    #[test]
    fn mini_boss_counts_are_drawn_independently() {
        let processor = RewardProcessor::new(
            Arc::new(MockCharacterRegistry::new()),
            Arc::new(InMemoryInventory::new()),
            Arc::new(SequenceRandom::new([3, 2])),
        );

        let chests = processor.roll_chests(EncounterKind::MiniBoss);

        assert_eq!(chests, vec![(ChestTier::Silver, 3), (ChestTier::Gold, 2)]);
        let total: u32 = chests.iter().map(|(_, count)| count).sum();
        assert!((2..=6).contains(&total));
    }

    #[test]
    fn final_boss_drops_gold_and_red() {
        let inventory = Arc::new(InMemoryInventory::new());
        let processor = RewardProcessor::new(
            Arc::new(accepting_registry(1)),
            inventory.clone(),
            Arc::new(FixedRandom::new(2)),
        );
        let team = Team::new("Solo", vec![CharacterId::new()]);

        let reward = processor.process(&encounter(EncounterKind::FinalBoss), &team);
        assert_eq!(reward.count_of(&ItemId::from("gold_chest")), 2);
        assert_eq!(reward.count_of(&ItemId::from("red_chest")), 2);
        assert_eq!(reward.count_of(&ItemId::from("rainbow_chest")), 0);
        assert_eq!(inventory.count(&ItemId::from("red_chest")), 2);
    }

    #[test]
    fn when_inventory_rejects_item_others_still_granted() {
        let mut inventory = MockInventorySink::new();
        inventory.expect_add_item().returning(|item_id, _| {
            if item_id.as_str() == "silver_chest" {
                Err(InventoryError::Rejected {
                    item: item_id.to_string(),
                    reason: "bag full".into(),
                })
            } else {
                Ok(())
            }
        });
        let processor = RewardProcessor::new(
            Arc::new(accepting_registry(1)),
            Arc::new(inventory),
            Arc::new(FixedRandom::highest()),
        );
        let team = Team::new("Solo", vec![CharacterId::new()]);

        let reward = processor.process(&encounter(EncounterKind::MiniBoss), &team);
        assert_eq!(reward.count_of(&ItemId::from("silver_chest")), 0);
        assert_eq!(reward.count_of(&ItemId::from("gold_chest")), 3);
    }

    #[test]
    fn when_experience_fails_for_one_member_others_still_granted() {
        let unlucky = CharacterId::new();
        let mut registry = MockCharacterRegistry::new();
        registry
            .expect_add_experience()
            .times(3)
            .returning(move |id, _| {
                if id == unlucky {
                    Err(RegistryError::CharacterNotFound(id.to_string()))
                } else {
                    Ok(())
                }
            });
        let processor = RewardProcessor::new(
            Arc::new(registry),
            Arc::new(InMemoryInventory::new()),
            Arc::new(FixedRandom::lowest()),
        );
        let team = Team::new("Trio", vec![CharacterId::new(), unlucky, CharacterId::new()]);

        let reward = processor.process(&encounter(EncounterKind::Normal), &team);
        assert_eq!(reward.exp, 80);
        assert_eq!(reward.total_items(), 1);
    }
}
