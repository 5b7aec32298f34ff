//! 物品目录：四张按大类划分的静态表 + 开局物品 + 每类槽位数

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::schema::{
    CatalogFile, InventoryEntry, ItemCategory, ItemDefinition, ItemRecord, ItemSlot,
};

/// 只读物品目录。同一个 key 可以出现在不同大类里，
/// 不指定大类时按 [`ItemCategory::SEARCH_ORDER`] 取第一个
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    potions: BTreeMap<String, ItemDefinition>,
    skills: BTreeMap<String, ItemDefinition>,
    tokens: BTreeMap<String, ItemDefinition>,
    weapons: BTreeMap<String, ItemDefinition>,
    default_inventory: Vec<(String, InventoryEntry)>,
    slots_per_category: BTreeMap<ItemCategory, i32>,
}

/// 加载完成后共享给所有背包
#[derive(Resource, Clone, Debug)]
pub struct CatalogResource(pub Arc<ItemCatalog>);

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, category: ItemCategory) -> Option<&BTreeMap<String, ItemDefinition>> {
        match category {
            ItemCategory::Potion => Some(&self.potions),
            ItemCategory::Skill => Some(&self.skills),
            ItemCategory::Token => Some(&self.tokens),
            ItemCategory::Weapon => Some(&self.weapons),
            ItemCategory::Undefined => None,
        }
    }

    fn store_mut(&mut self, category: ItemCategory) -> Option<&mut BTreeMap<String, ItemDefinition>> {
        match category {
            ItemCategory::Potion => Some(&mut self.potions),
            ItemCategory::Skill => Some(&mut self.skills),
            ItemCategory::Token => Some(&mut self.tokens),
            ItemCategory::Weapon => Some(&mut self.weapons),
            ItemCategory::Undefined => None,
        }
    }

    /* ---------------------------- 构建 ---------------------------- */

    /// 按定义自带的大类放入对应表；大类为 Undefined 时拒绝
    pub fn insert(&mut self, key: impl Into<String>, definition: ItemDefinition) -> bool {
        let key = key.into();
        match self.store_mut(definition.category) {
            Some(store) => {
                store.insert(key, definition);
                true
            }
            None => {
                warn!("目录拒绝无大类的物品 {key}");
                false
            }
        }
    }

    #[must_use]
    pub fn with_item(mut self, key: impl Into<String>, definition: ItemDefinition) -> Self {
        self.insert(key, definition);
        self
    }

    #[must_use]
    pub fn with_slots(mut self, category: ItemCategory, capacity: i32) -> Self {
        self.slots_per_category.insert(category, capacity);
        self
    }

    #[must_use]
    pub fn with_default_item(mut self, key: impl Into<String>, entry: InventoryEntry) -> Self {
        self.default_inventory.push((key.into(), entry));
        self
    }

    /* ---------------------------- 查询 ---------------------------- */

    /// 指定大类的存在性检查；Undefined 一律 false
    pub fn item_exists(&self, key: &str, category: ItemCategory) -> bool {
        self.store(category).is_some_and(|s| s.contains_key(key))
    }

    /// 精确大类查找；传 Undefined 时等同 [`Self::find_item`]
    pub fn get(&self, key: &str, category: ItemCategory) -> Option<&ItemDefinition> {
        match self.store(category) {
            Some(store) => store.get(key),
            None => self.find_item(key).map(|(_, def)| def),
        }
    }

    /// 找不到时给默认定义（大类为 Undefined）
    pub fn definition_or_default(&self, key: &str, category: ItemCategory) -> ItemDefinition {
        self.get(key, category).cloned().unwrap_or_default()
    }

    pub fn potion(&self, key: &str) -> Option<&ItemDefinition> {
        self.potions.get(key)
    }

    pub fn skill(&self, key: &str) -> Option<&ItemDefinition> {
        self.skills.get(key)
    }

    pub fn token(&self, key: &str) -> Option<&ItemDefinition> {
        self.tokens.get(key)
    }

    pub fn weapon(&self, key: &str) -> Option<&ItemDefinition> {
        self.weapons.get(key)
    }

    /// 按 Potion → Skill → Token → Weapon 的顺序找第一个
    pub fn find_item(&self, key: &str) -> Option<(ItemCategory, &ItemDefinition)> {
        ItemCategory::SEARCH_ORDER.iter().find_map(|&category| {
            self.store(category)
                .and_then(|s| s.get(key))
                .map(|def| (category, def))
        })
    }

    /// 某一类的全部定义；Undefined 时按查找顺序拼接四类，不去重
    pub fn definitions(&self, category: ItemCategory) -> Vec<(&str, &ItemDefinition)> {
        ItemCategory::SEARCH_ORDER
            .iter()
            .filter(|&&c| category.accepts(c))
            .filter_map(|&c| self.store(c))
            .flat_map(|store| store.iter().map(|(k, v)| (k.as_str(), v)))
            .collect()
    }

    pub fn default_inventory(&self) -> &[(String, InventoryEntry)] {
        &self.default_inventory
    }

    pub fn slots_per_category(&self) -> &BTreeMap<ItemCategory, i32> {
        &self.slots_per_category
    }

    pub fn slot_capacity(&self, category: ItemCategory) -> Option<i32> {
        self.slots_per_category.get(&category).copied()
    }

    /// 槽位本身有效，且目录为该类声明了足够的容量
    pub fn is_valid_item_slot(&self, slot: ItemSlot) -> bool {
        slot.is_valid()
            && self
                .slot_capacity(slot.category)
                .is_some_and(|capacity| slot.index < capacity)
    }

    /// 四类定义总数（重复 key 各算一次）
    pub fn len(&self) -> usize {
        self.potions.len() + self.skills.len() + self.tokens.len() + self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 加载后自检，返回可读的告警
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (key, entry) in &self.default_inventory {
            if !self.item_exists(key, entry.category) {
                problems.push(format!("开局物品 {key} 不在 {} 表中", entry.category));
            }
        }
        if self.slots_per_category.contains_key(&ItemCategory::Undefined) {
            problems.push("Undefined 不应声明槽位".to_string());
        }
        problems
    }
}

impl From<CatalogFile> for ItemCatalog {
    fn from(file: CatalogFile) -> Self {
        let convert = |records: BTreeMap<String, ItemRecord>, category: ItemCategory| {
            records
                .into_iter()
                .map(|(key, record)| (key, record.into_definition(category)))
                .collect::<BTreeMap<_, _>>()
        };
        Self {
            potions: convert(file.potions, ItemCategory::Potion),
            skills: convert(file.skills, ItemCategory::Skill),
            tokens: convert(file.tokens, ItemCategory::Token),
            weapons: convert(file.weapons, ItemCategory::Weapon),
            default_inventory: file
                .default_inventory
                .into_iter()
                .map(|d| (d.key, InventoryEntry::new(d.category, d.count, d.level)))
                .collect(),
            slots_per_category: file.slots_per_category,
        }
    }
}
