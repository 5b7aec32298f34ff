use bevy::prelude::*;

use crate::data::schema::{ItemCategory, ItemSlot};

/* ---------------------------- 请求 ---------------------------- */

/// 给予物品；category 为 Undefined 时按目录查找顺序决定
#[derive(Event, Debug, Clone)]
pub struct GiveItemEvent {
    pub key: String,
    pub category: ItemCategory,
    pub count: i32,
    pub level: i32,
}

/// count <= 0 表示全部移除
#[derive(Event, Debug, Clone)]
pub struct RemoveItemEvent {
    pub key: String,
    pub count: i32,
}

/// 让 CLI 打印背包
#[derive(Event, Debug, Clone, Default)]
pub struct ListInventoryEvent {
    pub category: ItemCategory,
}

#[derive(Event, Debug, Clone, Default)]
pub struct FillSlotsEvent;

/// 用当前目录重建背包
#[derive(Event, Debug, Clone, Default)]
pub struct ReloadInventoryEvent;

/// 以 JSON 打印背包快照
#[derive(Event, Debug, Clone, Default)]
pub struct DumpInventoryEvent;

/* ---------------------------- 通知 ---------------------------- */

/// 账本里某个物品被加入 / 移除
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ItemChanged {
    pub added: bool,
    pub key: String,
    pub category: ItemCategory,
}

/// 某个槽位内容变化；key 为空表示被清空
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SlotChanged {
    pub slot: ItemSlot,
    pub key: String,
    pub category: ItemCategory,
}

/// 背包整体重建完毕
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InventoryLoaded;
