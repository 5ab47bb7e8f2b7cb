use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardItem {
    pub item_id: ItemId,
    pub count: u32,
}

/// What one victory paid out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardInfo {
    pub exp: u64,
    pub items: Vec<RewardItem>,
}

impl RewardInfo {
    /// Adds `count` of an item, merging with an existing entry.
    pub fn add_item(&mut self, item_id: ItemId, count: u32) {
        merge_item(&mut self.items, item_id, count);
    }

    pub fn count_of(&self, item_id: &ItemId) -> u32 {
        self.items
            .iter()
            .filter(|item| &item.item_id == item_id)
            .map(|item| item.count)
            .sum()
    }

    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.count).sum()
    }
}

pub(crate) fn merge_item(items: &mut Vec<RewardItem>, item_id: ItemId, count: u32) {
    if count == 0 {
        return;
    }
    match items.iter_mut().find(|item| item.item_id == item_id) {
        Some(existing) => existing.count += count,
        None => items.push(RewardItem { item_id, count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_same_item() {
        let mut info = RewardInfo::default();
        info.add_item(ItemId::new("silver_chest"), 1);
        info.add_item(ItemId::new("gold_chest"), 2);
        info.add_item(ItemId::new("silver_chest"), 1);

        assert_eq!(info.items.len(), 2);
        assert_eq!(info.count_of(&ItemId::new("silver_chest")), 2);
        assert_eq!(info.total_items(), 4);
    }

    #[test]
    fn zero_count_is_ignored() {
        let mut info = RewardInfo::default();
        info.add_item(ItemId::new("red_chest"), 0);
        assert!(info.items.is_empty());
    }
}
