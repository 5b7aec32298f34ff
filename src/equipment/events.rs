use bevy::prelude::*;

use crate::data::schema::{ItemCategory, ItemSlot};

/// 把背包里已有的物品放进槽位
#[derive(Event, Debug, Clone)]
pub struct EquipEvent {
    pub slot: ItemSlot,
    pub key: String,
}

#[derive(Event, Debug, Clone)]
pub struct UnequipEvent {
    pub slot: ItemSlot,
}

/// 让 CLI 打印槽位
#[derive(Event, Debug, Clone, Default)]
pub struct ListSlotsEvent {
    pub category: ItemCategory,
    pub include_empty: bool,
}
