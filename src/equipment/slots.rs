//! 槽位表：(大类, 序号) → 物品 key，空串表示空位

use std::collections::BTreeMap;

use crate::data::schema::{ItemCategory, ItemSlot};

/// 初始化后只改内容不改形状；按大类、序号排好
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotTable {
    slots: Vec<(ItemSlot, String)>,
}

impl SlotTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每个声明了容量 N 的大类生成 0..N 个空槽；Undefined 不生成
    pub fn from_capacities(capacities: &BTreeMap<ItemCategory, i32>) -> Self {
        let slots = capacities
            .iter()
            .filter(|(category, _)| category.is_defined())
            .flat_map(|(&category, &capacity)| {
                (0..capacity.max(0)).map(move |index| (ItemSlot::new(category, index), String::new()))
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 槽位不存在时为 None；存在但空时为 Some("")
    pub fn get(&self, slot: ItemSlot) -> Option<&str> {
        self.slots
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, key)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemSlot, &str)> {
        self.slots.iter().map(|(s, key)| (*s, key.as_str()))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (ItemSlot, &mut String)> {
        self.slots.iter_mut().map(|(s, key)| (*s, key))
    }

    /// 直接写入，不做去重；返回槽位是否存在
    pub(crate) fn assign(&mut self, slot: ItemSlot, key: &str) -> bool {
        match self.slots.iter_mut().find(|(s, _)| *s == slot) {
            Some((_, occupant)) => {
                key.clone_into(occupant);
                true
            }
            None => false,
        }
    }

    pub fn holds_in_category(&self, key: &str, category: ItemCategory) -> bool {
        self.slots
            .iter()
            .any(|(s, occupant)| s.category == category && occupant == key)
    }

    /// 该大类序号最小的空槽
    pub fn lowest_empty(&self, category: ItemCategory) -> Option<ItemSlot> {
        self.slots
            .iter()
            .filter(|(s, occupant)| s.category == category && occupant.is_empty())
            .map(|(s, _)| *s)
            .min_by_key(|s| s.index)
    }

    /// 所有放着 key 的槽位
    pub fn slots_holding(&self, key: &str) -> Vec<ItemSlot> {
        self.slots
            .iter()
            .filter(|(_, occupant)| !key.is_empty() && occupant == key)
            .map(|(s, _)| *s)
            .collect()
    }
}
