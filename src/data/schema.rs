use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 物品大类；`Undefined` 只作哨兵：查询时表示“全部”，返回时表示“没找到”
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ItemCategory {
    Potion,
    Skill,
    Token,
    Weapon,
    #[default]
    Undefined,
}

impl ItemCategory {
    /// 不指定大类时的查找顺序，属于对外约定
    pub const SEARCH_ORDER: [ItemCategory; 4] = [
        ItemCategory::Potion,
        ItemCategory::Skill,
        ItemCategory::Token,
        ItemCategory::Weapon,
    ];

    pub fn is_defined(self) -> bool {
        self != ItemCategory::Undefined
    }

    /// 作为过滤条件：`Undefined` 匹配一切
    pub fn accepts(self, category: ItemCategory) -> bool {
        self == ItemCategory::Undefined || self == category
    }

    /// CLI 用，大小写不敏感，也认复数
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "potion" | "potions" => Some(Self::Potion),
            "skill" | "skills" => Some(Self::Skill),
            "token" | "tokens" => Some(Self::Token),
            "weapon" | "weapons" => Some(Self::Weapon),
            "all" | "any" | "undefined" => Some(Self::Undefined),
            _ => None,
        }
    }

    /// 静态表里省略 max_count 时的取值；代币默认不限量
    fn default_max_count(self) -> i32 {
        match self {
            ItemCategory::Token => 0,
            _ => 1,
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemCategory::Potion => "Potion",
            ItemCategory::Skill => "Skill",
            ItemCategory::Token => "Token",
            ItemCategory::Weapon => "Weapon",
            ItemCategory::Undefined => "Undefined",
        };
        f.write_str(name)
    }
}

/// `<= 0` 表示无上限，换成 `i32::MAX` 参与 clamp
pub fn effective_limit(limit: i32) -> i32 {
    if limit <= 0 { i32::MAX } else { limit }
}

/* ---------------------------- 静态物品定义 ---------------------------- */

/// 物品静态定义（运行期只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub category: ItemCategory,
    pub name: String,
    pub description: String,
    /// 图标资产路径
    pub icon: String,
    pub price: i32,
    /// `<= 0` 表示不限
    pub max_count: i32,
    /// `<= 0` 表示不限
    pub max_level: i32,
    /// 装备后授予的技能（资产路径）
    pub granted_ability: Option<String>,
    /// `<= 0` 表示跟随角色等级
    pub ability_level: i32,
    /// 仅武器：要生成的武器 actor
    pub weapon_actor: Option<String>,
}

impl Default for ItemDefinition {
    fn default() -> Self {
        Self {
            category: ItemCategory::Undefined,
            name: String::new(),
            description: String::new(),
            icon: String::new(),
            price: 0,
            max_count: 1,
            max_level: 1,
            granted_ability: None,
            ability_level: 1,
            weapon_actor: None,
        }
    }
}

impl ItemDefinition {
    /// 按大类的默认值建一个定义
    pub fn new(category: ItemCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
            max_count: category.default_max_count(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_count(mut self, max_count: i32) -> Self {
        self.max_count = max_count;
        self
    }

    #[must_use]
    pub fn with_max_level(mut self, max_level: i32) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn effective_max_count(&self) -> i32 {
        effective_limit(self.max_count)
    }

    pub fn effective_max_level(&self) -> i32 {
        effective_limit(self.max_level)
    }
}

/* ---------------------------- 槽位 / 背包条目 ---------------------------- */

/// 槽位 = (大类, 序号)；默认值 (Undefined, -1) 是无效哨兵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemSlot {
    pub category: ItemCategory,
    pub index: i32,
}

impl Default for ItemSlot {
    fn default() -> Self {
        Self {
            category: ItemCategory::Undefined,
            index: -1,
        }
    }
}

impl ItemSlot {
    pub fn new(category: ItemCategory, index: i32) -> Self {
        Self { category, index }
    }

    pub fn is_valid(&self) -> bool {
        self.category.is_defined() && self.index >= 0
    }
}

impl fmt::Display for ItemSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.category, self.index)
    }
}

/// 背包里某个物品的动态数据；数量与等级都不应小于 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub category: ItemCategory,
    pub count: i32,
    pub level: i32,
}

impl InventoryEntry {
    /// 尚未拥有时参与合并的初值
    pub const ABSENT: InventoryEntry = InventoryEntry {
        category: ItemCategory::Undefined,
        count: 0,
        level: 1,
    };

    pub fn new(category: ItemCategory, count: i32, level: i32) -> Self {
        Self {
            category,
            count,
            level,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.count > 0 && self.category.is_defined()
    }

    /// 叠加数量、覆盖等级与大类，结果夹在 [1, 上限] 内
    pub fn merged(&self, incoming: &InventoryEntry, max_count: i32, max_level: i32) -> Self {
        let max_count = effective_limit(max_count);
        let max_level = effective_limit(max_level);
        Self {
            category: incoming.category,
            count: self.count.saturating_add(incoming.count).clamp(1, max_count),
            level: incoming.level.clamp(1, max_level),
        }
    }
}

/* ---------------------------- RON 文件结构 ---------------------------- */

/// 文件里的一条物品；大类由所在的表决定
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub price: i32,
    #[serde(default)]
    pub max_count: Option<i32>,
    #[serde(default)]
    pub max_level: Option<i32>,
    #[serde(default)]
    pub granted_ability: Option<String>,
    #[serde(default)]
    pub ability_level: Option<i32>,
    #[serde(default)]
    pub weapon_actor: Option<String>,
}

impl ItemRecord {
    pub fn into_definition(self, category: ItemCategory) -> ItemDefinition {
        let base = ItemDefinition::new(category, self.name);
        ItemDefinition {
            description: self.description,
            icon: self.icon,
            price: self.price,
            max_count: self.max_count.unwrap_or(base.max_count),
            max_level: self.max_level.unwrap_or(base.max_level),
            granted_ability: self.granted_ability,
            ability_level: self.ability_level.unwrap_or(base.ability_level),
            weapon_actor: self.weapon_actor,
            ..base
        }
    }
}

fn one() -> i32 {
    1
}

/// 开局自带的物品
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultItem {
    pub key: String,
    pub category: ItemCategory,
    #[serde(default = "one")]
    pub count: i32,
    #[serde(default = "one")]
    pub level: i32,
}

/// `data/items.catalog.ron` 的整体结构
#[derive(Asset, TypePath, Deserialize, Debug, Default)]
pub struct CatalogFile {
    #[serde(default)]
    pub potions: BTreeMap<String, ItemRecord>,
    #[serde(default)]
    pub skills: BTreeMap<String, ItemRecord>,
    #[serde(default)]
    pub tokens: BTreeMap<String, ItemRecord>,
    #[serde(default)]
    pub weapons: BTreeMap<String, ItemRecord>,
    #[serde(default)]
    pub default_inventory: Vec<DefaultItem>,
    #[serde(default)]
    pub slots_per_category: BTreeMap<ItemCategory, i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_validity() {
        assert!(ItemSlot::new(ItemCategory::Potion, 0).is_valid());
        assert!(!ItemSlot::new(ItemCategory::Potion, -1).is_valid());
        assert!(!ItemSlot::new(ItemCategory::Undefined, 0).is_valid());
        assert!(!ItemSlot::default().is_valid());
    }

    #[test]
    fn merge_clamps_count_and_overrides_level() {
        let old = InventoryEntry::new(ItemCategory::Potion, 3, 2);
        let incoming = InventoryEntry::new(ItemCategory::Potion, 10, 7);
        let merged = old.merged(&incoming, 5, 3);
        assert_eq!(merged, InventoryEntry::new(ItemCategory::Potion, 5, 3));
    }

    #[test]
    fn merge_with_unlimited_caps_saturates() {
        let old = InventoryEntry::new(ItemCategory::Token, i32::MAX - 1, 1);
        let incoming = InventoryEntry::new(ItemCategory::Token, 10, 1);
        let merged = old.merged(&incoming, 0, -1);
        assert_eq!(merged.count, i32::MAX);
    }

    #[test]
    fn merge_from_absent_takes_incoming_category() {
        let incoming = InventoryEntry::new(ItemCategory::Skill, 1, 4);
        let merged = InventoryEntry::ABSENT.merged(&incoming, 1, 0);
        assert_eq!(merged, InventoryEntry::new(ItemCategory::Skill, 1, 4));
        assert!(!InventoryEntry::ABSENT.is_valid());
    }

    #[test]
    fn token_records_default_to_unlimited() {
        let record = ItemRecord {
            name: "Soul".into(),
            description: String::new(),
            icon: String::new(),
            price: 0,
            max_count: None,
            max_level: None,
            granted_ability: None,
            ability_level: None,
            weapon_actor: None,
        };
        let token = record.clone().into_definition(ItemCategory::Token);
        assert_eq!(token.max_count, 0);
        assert_eq!(token.effective_max_count(), i32::MAX);

        let potion = record.into_definition(ItemCategory::Potion);
        assert_eq!(potion.max_count, 1);
        assert_eq!(potion.category, ItemCategory::Potion);
    }

    #[test]
    fn category_names() {
        assert_eq!(ItemCategory::from_name("Weapons"), Some(ItemCategory::Weapon));
        assert_eq!(ItemCategory::from_name("all"), Some(ItemCategory::Undefined));
        assert_eq!(ItemCategory::from_name("sword"), None);
        assert!(ItemCategory::Undefined.accepts(ItemCategory::Token));
        assert!(!ItemCategory::Skill.accepts(ItemCategory::Token));
    }
}
