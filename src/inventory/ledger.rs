//! 背包账本：物品 key → (大类, 数量, 等级)，保持插入顺序

use crate::data::schema::{InventoryEntry, ItemCategory};

/// 数量 <= 0 的条目不应出现在账本里，由控制器负责删除
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLedger {
    entries: Vec<(String, InventoryEntry)>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&InventoryEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    /// 已有则原位覆盖，返回旧值
    pub fn insert(&mut self, key: &str, entry: InventoryEntry) -> Option<InventoryEntry> {
        match self.position(key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, entry)),
            None => {
                self.entries.push((key.to_string(), entry));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<InventoryEntry> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InventoryEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// `filter` 为 Undefined 时返回全部
    pub fn keys(&self, filter: ItemCategory) -> Vec<String> {
        self.iter()
            .filter(|(_, e)| filter.accepts(e.category))
            .map(|(k, _)| k.to_string())
            .collect()
    }
}
