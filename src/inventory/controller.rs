//! 背包控制器：账本 + 槽位表 + 通知，挂在玩家实体上
//!
//! 所有修改都走这里，修改完立即同步通知监听者。目录以 `Arc` 注入，
//! 在控制器生命周期内只读。

use bevy::prelude::*;
use serde_derive::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::InventoryError;
use super::ledger::InventoryLedger;
use super::notify::InventoryNotifier;
use crate::data::catalog::ItemCatalog;
use crate::data::schema::{InventoryEntry, ItemCategory, ItemDefinition, ItemSlot};
use crate::equipment::slots::SlotTable;

/// 给 UI / 角色等只读方用的背包视图
pub trait InventorySource {
    fn ledger(&self) -> &InventoryLedger;
    fn slot_table(&self) -> &SlotTable;
    fn notifier_mut(&mut self) -> &mut InventoryNotifier;
}

/// 持久化方看到的不透明数据
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub items: Vec<(String, InventoryEntry)>,
    pub slots: Vec<(ItemSlot, String)>,
}

#[derive(Component, Debug)]
pub struct InventoryController {
    catalog: Arc<ItemCatalog>,
    ledger: InventoryLedger,
    slots: SlotTable,
    notifier: InventoryNotifier,
}

impl InventorySource for InventoryController {
    fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    fn slot_table(&self) -> &SlotTable {
        &self.slots
    }

    fn notifier_mut(&mut self) -> &mut InventoryNotifier {
        &mut self.notifier
    }
}

impl InventoryController {
    /// 账本与槽位表为空，需要再调用 [`Self::initialize`]
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self {
            catalog,
            ledger: InventoryLedger::new(),
            slots: SlotTable::new(),
            notifier: InventoryNotifier::default(),
        }
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /* ---------------------------- 初始化 ---------------------------- */

    /// 按目录重建槽位表、原样拷贝开局物品、补满空槽，最后发一次 loaded
    pub fn initialize(&mut self) {
        self.ledger.clear();
        self.slots = SlotTable::from_capacities(self.catalog.slots_per_category());

        // 开局物品不做校验
        for (key, entry) in self.catalog.default_inventory() {
            self.ledger.insert(key, *entry);
        }

        self.fill_empty_slots();
        info!(
            "背包初始化：{} 件物品，{} 个槽位",
            self.ledger.len(),
            self.slots.len()
        );
        self.notifier.notify_loaded();
    }

    /// 换目录后重建
    pub fn reload(&mut self, catalog: Arc<ItemCatalog>) {
        self.catalog = catalog;
        self.initialize();
    }

    /* ---------------------------- 账本 ---------------------------- */

    /// 参数非法时返回 Err，不改动任何状态
    pub fn try_add_item(
        &mut self,
        key: &str,
        category: ItemCategory,
        count: i32,
        level: i32,
        auto_slot: bool,
    ) -> Result<bool, InventoryError> {
        if key.is_empty() {
            return Err(InventoryError::EmptyKey);
        }
        if !category.is_defined() {
            return Err(InventoryError::UndefinedCategory(key.to_string()));
        }
        if count <= 0 {
            return Err(InventoryError::NonPositiveCount {
                key: key.to_string(),
                count,
            });
        }
        if level <= 0 {
            return Err(InventoryError::NonPositiveLevel {
                key: key.to_string(),
                level,
            });
        }
        let (max_count, max_level) = match self.catalog.get(key, category) {
            Some(def) => (def.effective_max_count(), def.effective_max_level()),
            None => {
                return Err(InventoryError::UnknownItem {
                    key: key.to_string(),
                    category,
                });
            }
        };

        let old = self
            .ledger
            .get(key)
            .copied()
            .unwrap_or(InventoryEntry::ABSENT);
        let new = old.merged(
            &InventoryEntry::new(category, count, level),
            max_count,
            max_level,
        );

        let mut changed = false;
        if new != old {
            self.ledger.insert(key, new);
            debug!("{key}: {} → {} (lv {})", old.count, new.count, new.level);
            self.notifier.notify_item_changed(true, key, category);
            changed = true;
        }
        if auto_slot {
            changed |= auto_slot_into(&mut self.slots, &mut self.notifier, key, category);
        }
        Ok(changed)
    }

    /// 加入物品，数量叠加并夹在上限内；返回账本或槽位是否有变化
    pub fn add_item(
        &mut self,
        key: &str,
        category: ItemCategory,
        count: i32,
        level: i32,
        auto_slot: bool,
    ) -> bool {
        self.try_add_item(key, category, count, level, auto_slot)
            .unwrap_or_else(|e| {
                warn!("add_item rejected: {e}");
                false
            })
    }

    /// `remove_count <= 0` 表示全部移除；删光时顺带清掉所有相关槽位
    pub fn try_remove_item(&mut self, key: &str, remove_count: i32) -> Result<bool, InventoryError> {
        if key.is_empty() {
            return Err(InventoryError::EmptyKey);
        }
        let Some(mut entry) = self.ledger.get(key).copied() else {
            return Err(InventoryError::NotOwned(key.to_string()));
        };

        entry.count = if remove_count <= 0 {
            0
        } else {
            entry.count.saturating_sub(remove_count)
        };

        if entry.count > 0 {
            self.ledger.insert(key, entry);
        } else {
            self.ledger.remove(key);
            for (slot, occupant) in self.slots.iter_mut() {
                if *occupant == key {
                    occupant.clear();
                    self.notifier.notify_slot_changed(slot, "");
                }
            }
        }

        debug!("{key}: 剩余 {}", entry.count.max(0));
        self.notifier.notify_item_changed(false, key, entry.category);
        Ok(true)
    }

    pub fn remove_item(&mut self, key: &str, remove_count: i32) -> bool {
        match self.try_remove_item(key, remove_count) {
            Ok(changed) => changed,
            // 没有的东西删不掉，不算异常
            Err(InventoryError::NotOwned(key)) => {
                debug!("remove_item: {key} 不在背包里");
                false
            }
            Err(e) => {
                warn!("remove_item rejected: {e}");
                false
            }
        }
    }

    /// 未拥有时为 0
    pub fn count(&self, key: &str) -> i32 {
        self.ledger.get(key).map_or(0, |e| e.count)
    }

    pub fn entry(&self, key: &str) -> Option<InventoryEntry> {
        self.ledger.get(key).copied()
    }

    /// `category` 为 Undefined 时返回全部
    pub fn owned_keys(&self, category: ItemCategory) -> Vec<String> {
        self.ledger.keys(category)
    }

    /* ---------------------------- 槽位 ---------------------------- */

    /// 把 key 放进槽位（空串即清空），并从其它槽位移走同一个 key；
    /// 返回目标槽位是否存在
    pub fn set_slot(&mut self, slot: ItemSlot, key: &str) -> bool {
        let mut found = false;
        for (s, occupant) in self.slots.iter_mut() {
            if s == slot {
                found = true;
                key.clone_into(occupant);
                self.notifier.notify_slot_changed(s, key);
            } else if !key.is_empty() && *occupant == key {
                occupant.clear();
                self.notifier.notify_slot_changed(s, "");
            }
        }
        found
    }

    /// 槽位里的 key 与其定义；槽位不存在或为空时为 ("", None)
    pub fn slotted_item(&self, slot: ItemSlot) -> (&str, Option<&ItemDefinition>) {
        match self.slots.get(slot) {
            Some(key) => (key, self.catalog.find_item(key).map(|(_, def)| def)),
            None => ("", None),
        }
    }

    /// 按表顺序列出槽位内容；`include_empty` 为 false 时跳过空位
    pub fn slotted_items(&self, category: ItemCategory, include_empty: bool) -> Vec<String> {
        self.matching_slots(category, include_empty)
            .into_iter()
            .map(|(_, key)| key.to_string())
            .collect()
    }

    /// 同 [`Self::slotted_items`]，连槽位一起返回
    pub fn matching_slots(&self, category: ItemCategory, include_empty: bool) -> Vec<(ItemSlot, &str)> {
        self.slots
            .iter()
            .filter(|(slot, key)| category.accepts(slot.category) && (include_empty || !key.is_empty()))
            .collect()
    }

    /// 已在该类槽位里则不动；否则放进序号最小的空槽
    pub fn auto_slot(&mut self, key: &str, category: ItemCategory) -> bool {
        auto_slot_into(&mut self.slots, &mut self.notifier, key, category)
    }

    /// 账本里的每件物品都尝试自动上槽
    pub fn fill_empty_slots(&mut self) {
        for (key, entry) in self.ledger.iter() {
            auto_slot_into(&mut self.slots, &mut self.notifier, key, entry.category);
        }
    }

    /// 一行摘要，给 CLI 的 status 用
    pub fn summary(&self) -> String {
        let per_category: Vec<String> = ItemCategory::SEARCH_ORDER
            .iter()
            .map(|&c| format!("{c} {}", self.ledger.keys(c).len()))
            .collect();
        format!(
            "物品 {}（{}），槽位 {}/{}",
            self.ledger.len(),
            per_category.join(", "),
            self.slotted_items(ItemCategory::Undefined, false).len(),
            self.slots.len()
        )
    }

    /* ---------------------------- 快照 ---------------------------- */

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            items: self
                .ledger
                .iter()
                .map(|(k, e)| (k.to_string(), *e))
                .collect(),
            slots: self
                .slots
                .iter()
                .map(|(s, k)| (s, k.to_string()))
                .collect(),
        }
    }

    /// 恢复快照，发一次 loaded。
    ///
    /// 条目要有效且在目录的同一大类里，数量、等级夹回 [1, 上限]；
    /// 槽位只接受账本里同类的物品，每个 key 至多一个槽位
    pub fn apply_snapshot(&mut self, snapshot: &InventorySnapshot) {
        self.ledger.clear();
        for (key, entry) in &snapshot.items {
            let def = match self.catalog.get(key, entry.category) {
                Some(def) if entry.is_valid() => def,
                _ => {
                    warn!("快照条目 {key} ({}) 无效，跳过", entry.category);
                    continue;
                }
            };
            let restored = InventoryEntry::new(
                entry.category,
                entry.count.clamp(1, def.effective_max_count()),
                entry.level.clamp(1, def.effective_max_level()),
            );
            self.ledger.insert(key, restored);
        }

        self.slots = SlotTable::from_capacities(self.catalog.slots_per_category());
        for (slot, key) in &snapshot.slots {
            if key.is_empty() {
                continue;
            }
            if self.ledger.get(key).map(|e| e.category) != Some(slot.category) {
                warn!("快照槽位 {slot} 里的 {key} 不在背包的同类物品里，跳过");
                continue;
            }
            if !self.slots.slots_holding(key).is_empty() {
                warn!("快照里 {key} 占了多个槽位，{slot} 跳过");
                continue;
            }
            if !self.slots.assign(*slot, key) {
                warn!("快照里的槽位 {slot} 在当前目录中不存在");
            }
        }
        self.notifier.notify_loaded();
    }
}

fn auto_slot_into(
    slots: &mut SlotTable,
    notifier: &mut InventoryNotifier,
    key: &str,
    category: ItemCategory,
) -> bool {
    if slots.holds_in_category(key, category) {
        return false;
    }
    let Some(empty) = slots.lowest_empty(category) else {
        return false;
    };
    slots.assign(empty, key);
    notifier.notify_slot_changed(empty, key);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::events::{ItemChanged, SlotChanged};
    use crate::inventory::notify::{InventoryNotice, NotificationQueue};
    use proptest::prelude::*;

    fn catalog() -> ItemCatalog {
        ItemCatalog::new()
            .with_item(
                "HealthPotion",
                ItemDefinition::new(ItemCategory::Potion, "Health Potion").with_max_count(5),
            )
            .with_item(
                "ManaPotion",
                ItemDefinition::new(ItemCategory::Potion, "Mana Potion").with_max_count(5),
            )
            .with_item(
                "Elixir",
                ItemDefinition::new(ItemCategory::Potion, "Elixir").with_max_count(5),
            )
            .with_item(
                "Sword",
                ItemDefinition::new(ItemCategory::Weapon, "Sword").with_max_level(3),
            )
            .with_item("Axe", ItemDefinition::new(ItemCategory::Weapon, "Axe"))
            .with_item("Soul", ItemDefinition::new(ItemCategory::Token, "Soul"))
            .with_item("Fireball", ItemDefinition::new(ItemCategory::Skill, "Fireball"))
            .with_item("Fireball", ItemDefinition::new(ItemCategory::Weapon, "Fireball Staff"))
            .with_slots(ItemCategory::Potion, 2)
            .with_slots(ItemCategory::Weapon, 2)
            .with_slots(ItemCategory::Skill, 1)
            .with_default_item(
                "HealthPotion",
                InventoryEntry::new(ItemCategory::Potion, 3, 1),
            )
    }

    /// 初始化好的控制器 + 挂上的通知队列
    fn controller() -> (InventoryController, NotificationQueue) {
        let mut c = InventoryController::new(Arc::new(catalog()));
        let queue = NotificationQueue::default();
        queue.attach(c.notifier_mut());
        c.initialize();
        (c, queue)
    }

    fn potion(index: i32) -> ItemSlot {
        ItemSlot::new(ItemCategory::Potion, index)
    }

    fn weapon(index: i32) -> ItemSlot {
        ItemSlot::new(ItemCategory::Weapon, index)
    }

    #[test]
    fn initialize_seeds_and_slots() {
        let (c, queue) = controller();
        assert_eq!(c.count("HealthPotion"), 3);
        assert_eq!(c.slotted_item(potion(0)).0, "HealthPotion");
        assert_eq!(
            c.slotted_item(potion(0)).1.map(|d| d.name.as_str()),
            Some("Health Potion")
        );
        assert_eq!(c.slot_table().len(), 5);
        assert_eq!(
            queue.drain(),
            vec![
                InventoryNotice::SlotChanged(SlotChanged {
                    slot: potion(0),
                    key: "HealthPotion".into(),
                    category: ItemCategory::Potion,
                }),
                InventoryNotice::Loaded,
            ]
        );
    }

    #[test]
    fn initialize_twice_rebuilds_the_same_shape() {
        let (mut c, _queue) = controller();
        c.add_item("Sword", ItemCategory::Weapon, 1, 1, true);
        c.initialize();
        c.initialize();

        assert_eq!(c.slot_table().len(), 5);
        assert_eq!(c.slotted_items(ItemCategory::Undefined, false), vec!["HealthPotion"]);
        assert_eq!(c.count("Sword"), 0);
    }

    #[test]
    fn initialize_without_capacities_is_harmless() {
        let mut c = InventoryController::new(Arc::new(ItemCatalog::new()));
        c.initialize();
        assert!(c.slot_table().is_empty());
        assert!(!c.set_slot(potion(0), "HealthPotion"));
        assert!(!c.auto_slot("HealthPotion", ItemCategory::Potion));
    }

    #[test]
    fn add_clamps_to_max_count() {
        let (mut c, queue) = controller();
        queue.drain();

        assert!(c.add_item("HealthPotion", ItemCategory::Potion, 10, 1, true));
        assert_eq!(c.count("HealthPotion"), 5);
        assert_eq!(
            queue.drain(),
            vec![InventoryNotice::ItemChanged(ItemChanged {
                added: true,
                key: "HealthPotion".into(),
                category: ItemCategory::Potion,
            })]
        );

        // 已满且已上槽：无变化
        assert!(!c.add_item("HealthPotion", ItemCategory::Potion, 1, 1, true));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn add_clamps_level_and_overrides_it() {
        let (mut c, _queue) = controller();
        c.add_item("Sword", ItemCategory::Weapon, 1, 9, false);
        assert_eq!(c.entry("Sword").map(|e| e.level), Some(3));

        c.add_item("Sword", ItemCategory::Weapon, 1, 2, false);
        let entry = c.entry("Sword").unwrap();
        assert_eq!((entry.count, entry.level), (1, 2));
    }

    #[test]
    fn add_rejects_bad_input_without_side_effects() {
        let (mut c, queue) = controller();
        queue.drain();
        let before = c.snapshot();

        assert_eq!(
            c.try_add_item("", ItemCategory::Potion, 1, 1, true),
            Err(InventoryError::EmptyKey)
        );
        assert!(matches!(
            c.try_add_item("HealthPotion", ItemCategory::Undefined, 1, 1, true),
            Err(InventoryError::UndefinedCategory(_))
        ));
        assert!(matches!(
            c.try_add_item("HealthPotion", ItemCategory::Potion, 0, 1, true),
            Err(InventoryError::NonPositiveCount { count: 0, .. })
        ));
        assert!(matches!(
            c.try_add_item("HealthPotion", ItemCategory::Potion, 1, -2, true),
            Err(InventoryError::NonPositiveLevel { level: -2, .. })
        ));
        assert!(matches!(
            c.try_add_item("HealthPotion", ItemCategory::Weapon, 1, 1, true),
            Err(InventoryError::UnknownItem { .. })
        ));
        assert!(!c.add_item("Nothing", ItemCategory::Potion, 1, 1, true));

        assert_eq!(c.snapshot(), before);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn add_without_auto_slot_leaves_item_unslotted() {
        let (mut c, _queue) = controller();
        assert!(c.add_item("ManaPotion", ItemCategory::Potion, 1, 1, false));
        assert_eq!(c.slotted_items(ItemCategory::Potion, true), vec!["HealthPotion", ""]);

        // 已拥有但未上槽时，再加一次只会补槽
        assert!(c.add_item("ManaPotion", ItemCategory::Potion, 1, 1, true));
        assert_eq!(c.slotted_item(potion(1)).0, "ManaPotion");
    }

    #[test]
    fn auto_slot_stops_when_category_is_full() {
        let (mut c, queue) = controller();
        c.add_item("ManaPotion", ItemCategory::Potion, 1, 1, true);
        queue.drain();

        assert!(c.add_item("Elixir", ItemCategory::Potion, 1, 1, true));
        assert_eq!(c.count("Elixir"), 1);
        assert!(c.slot_table().slots_holding("Elixir").is_empty());
        // 只有账本通知
        assert_eq!(queue.drain().len(), 1);

        assert!(!c.auto_slot("Elixir", ItemCategory::Potion));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn auto_slot_takes_lowest_free_index() {
        let (mut c, _queue) = controller();
        c.add_item("Sword", ItemCategory::Weapon, 1, 1, false);
        c.add_item("Axe", ItemCategory::Weapon, 1, 1, false);
        c.set_slot(weapon(1), "Sword");

        assert!(c.auto_slot("Axe", ItemCategory::Weapon));
        assert_eq!(c.slotted_items(ItemCategory::Weapon, true), vec!["Axe", "Sword"]);
        assert!(!c.auto_slot("Axe", ItemCategory::Weapon));
    }

    #[test]
    fn remove_partial_keeps_entry() {
        let (mut c, queue) = controller();
        queue.drain();

        assert!(c.remove_item("HealthPotion", 2));
        assert_eq!(c.count("HealthPotion"), 1);
        assert_eq!(c.slotted_item(potion(0)).0, "HealthPotion");
        assert_eq!(
            queue.drain(),
            vec![InventoryNotice::ItemChanged(ItemChanged {
                added: false,
                key: "HealthPotion".into(),
                category: ItemCategory::Potion,
            })]
        );
    }

    #[test]
    fn remove_all_clears_every_slot() {
        let (mut c, queue) = controller();
        c.add_item("Sword", ItemCategory::Weapon, 1, 1, true);
        queue.drain();

        assert!(c.remove_item("Sword", 0));
        assert!(c.entry("Sword").is_none());
        assert!(c.slot_table().slots_holding("Sword").is_empty());
        assert_eq!(
            queue.drain(),
            vec![
                InventoryNotice::SlotChanged(SlotChanged {
                    slot: weapon(0),
                    key: String::new(),
                    category: ItemCategory::Weapon,
                }),
                InventoryNotice::ItemChanged(ItemChanged {
                    added: false,
                    key: "Sword".into(),
                    category: ItemCategory::Weapon,
                }),
            ]
        );
    }

    #[test]
    fn remove_negative_count_deletes_everything() {
        let (mut c, queue) = controller();
        queue.drain();

        assert!(c.remove_item("HealthPotion", -3));
        assert!(c.entry("HealthPotion").is_none());
        assert_eq!(c.slotted_item(potion(0)), ("", None));
        assert_eq!(queue.drain().len(), 2);
    }

    #[test]
    fn incoming_category_replaces_stored_one() {
        let (mut c, queue) = controller();
        c.add_item("Fireball", ItemCategory::Skill, 1, 1, false);
        queue.drain();

        assert!(c.add_item("Fireball", ItemCategory::Weapon, 1, 1, false));
        assert_eq!(
            c.entry("Fireball"),
            Some(InventoryEntry::new(ItemCategory::Weapon, 1, 1))
        );
        assert_eq!(c.owned_keys(ItemCategory::Skill), Vec::<String>::new());
        assert_eq!(
            queue.drain(),
            vec![InventoryNotice::ItemChanged(ItemChanged {
                added: true,
                key: "Fireball".into(),
                category: ItemCategory::Weapon,
            })]
        );
    }

    #[test]
    fn fill_refills_cleared_slots() {
        let (mut c, queue) = controller();
        c.add_item("ManaPotion", ItemCategory::Potion, 1, 1, false);
        c.set_slot(potion(0), "");
        queue.drain();

        c.fill_empty_slots();
        assert_eq!(
            c.slotted_items(ItemCategory::Potion, true),
            vec!["HealthPotion", "ManaPotion"]
        );
        assert_eq!(queue.drain().len(), 2);

        // 已全部上槽，再补一次没有变化
        c.fill_empty_slots();
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn remove_more_than_owned_deletes() {
        let (mut c, _queue) = controller();
        assert!(c.remove_item("HealthPotion", 99));
        assert_eq!(c.count("HealthPotion"), 0);
        assert_eq!(c.slotted_item(potion(0)), ("", None));
    }

    #[test]
    fn remove_unowned_is_silent() {
        let (mut c, queue) = controller();
        queue.drain();
        assert!(!c.remove_item("Sword", 1));
        assert_eq!(c.try_remove_item("", 1), Err(InventoryError::EmptyKey));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn set_slot_moves_item() {
        let (mut c, queue) = controller();
        queue.drain();

        assert!(c.set_slot(potion(1), "HealthPotion"));
        assert_eq!(c.slotted_items(ItemCategory::Potion, true), vec!["", "HealthPotion"]);
        assert_eq!(queue.drain().len(), 2);

        // 不存在的槽位：返回 false，但其它槽位里的同名物品照样被移走
        assert!(!c.set_slot(potion(7), "HealthPotion"));
        assert!(c.slot_table().slots_holding("HealthPotion").is_empty());
    }

    #[test]
    fn set_slot_with_empty_key_clears() {
        let (mut c, queue) = controller();
        queue.drain();
        assert!(c.set_slot(potion(0), ""));
        assert_eq!(c.slotted_item(potion(0)).0, "");
        assert_eq!(
            queue.drain(),
            vec![InventoryNotice::SlotChanged(SlotChanged {
                slot: potion(0),
                key: String::new(),
                category: ItemCategory::Potion,
            })]
        );
    }

    #[test]
    fn slotted_items_filters() {
        let (mut c, _queue) = controller();
        c.add_item("Fireball", ItemCategory::Skill, 1, 1, true);
        assert_eq!(
            c.slotted_items(ItemCategory::Undefined, true),
            vec!["HealthPotion", "", "Fireball", "", ""]
        );
        assert_eq!(
            c.slotted_items(ItemCategory::Undefined, false),
            vec!["HealthPotion", "Fireball"]
        );
        assert!(c.slotted_items(ItemCategory::Token, true).is_empty());
    }

    #[test]
    fn owned_keys_by_category() {
        let (mut c, _queue) = controller();
        c.add_item("Soul", ItemCategory::Token, 500, 1, true);
        assert_eq!(c.owned_keys(ItemCategory::Token), vec!["Soul"]);
        assert_eq!(c.owned_keys(ItemCategory::Undefined), vec!["HealthPotion", "Soul"]);
        // 代币不限量
        assert_eq!(c.count("Soul"), 500);
    }

    #[test]
    fn snapshot_round_trip() {
        let (mut c, queue) = controller();
        c.add_item("Sword", ItemCategory::Weapon, 1, 2, true);
        c.set_slot(weapon(1), "Sword");
        let snapshot = c.snapshot();

        c.initialize();
        queue.drain();
        c.apply_snapshot(&snapshot);
        assert_eq!(c.snapshot(), snapshot);
        assert_eq!(queue.drain(), vec![InventoryNotice::Loaded]);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: InventorySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn restoring_repairs_broken_snapshot() {
        let (mut c, queue) = controller();
        let snapshot = InventorySnapshot {
            items: vec![
                ("HealthPotion".into(), InventoryEntry::new(ItemCategory::Potion, 9, -7)),
                ("Sword".into(), InventoryEntry::new(ItemCategory::Undefined, 1, 1)),
                ("Axe".into(), InventoryEntry::new(ItemCategory::Potion, 1, 1)),
                ("Soul".into(), InventoryEntry::new(ItemCategory::Token, 0, 1)),
            ],
            slots: vec![
                (potion(0), "HealthPotion".into()),
                (potion(1), "HealthPotion".into()),
                (weapon(0), "Sword".into()),
                (weapon(1), "Fireball".into()),
            ],
        };
        queue.drain();

        c.apply_snapshot(&snapshot);
        assert_eq!(
            c.snapshot().items,
            vec![(
                "HealthPotion".to_string(),
                InventoryEntry::new(ItemCategory::Potion, 5, 1)
            )]
        );
        assert_eq!(c.slot_table().slots_holding("HealthPotion"), vec![potion(0)]);
        assert_eq!(
            c.slotted_items(ItemCategory::Undefined, false),
            vec!["HealthPotion"]
        );
        assert_eq!(queue.drain(), vec![InventoryNotice::Loaded]);
    }

    #[test]
    fn reload_switches_catalog() {
        let (mut c, _queue) = controller();
        let bigger = catalog().with_slots(ItemCategory::Token, 4);
        c.reload(Arc::new(bigger));
        assert_eq!(c.slot_table().len(), 9);
        assert_eq!(c.count("HealthPotion"), 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// 任意合法的加入序列后，数量与等级都等于逐步 clamp 的结果
        #[test]
        fn add_matches_clamped_arithmetic(
            steps in prop::collection::vec((1i32..8, 1i32..6), 1..12)
        ) {
            let (mut c, _queue) = controller();
            for (count, level) in steps {
                let before = c.count("Sword");
                c.add_item("Sword", ItemCategory::Weapon, count, level, true);
                let entry = c.entry("Sword").unwrap();
                prop_assert_eq!(entry.count, (before + count).clamp(1, 1));
                prop_assert_eq!(entry.level, level.clamp(1, 3));

                let before = c.count("HealthPotion");
                c.add_item("HealthPotion", ItemCategory::Potion, count, level, false);
                prop_assert_eq!(c.count("HealthPotion"), (before + count).clamp(1, 5));
            }
        }

        /// 任意 set_slot 序列后，一个 key 至多出现在一个槽位里
        #[test]
        fn an_item_occupies_at_most_one_slot(
            moves in prop::collection::vec((0usize..5, 0usize..4), 1..24)
        ) {
            let (mut c, _queue) = controller();
            let slots: Vec<ItemSlot> = c.slot_table().iter().map(|(s, _)| s).collect();
            let keys = ["HealthPotion", "Sword", "Fireball", ""];
            for (slot, key) in moves {
                c.set_slot(slots[slot], keys[key]);
                for key in keys.iter().filter(|k| !k.is_empty()) {
                    prop_assert!(c.slot_table().slots_holding(key).len() <= 1);
                }
            }
        }
    }
}
