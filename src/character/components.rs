use bevy::prelude::*;

use crate::data::schema::{ItemCategory, ItemSlot};
use crate::inventory::controller::{InventoryController, InventorySource};

/// 玩家标记组件
#[derive(Component)]
pub struct Player;

/// 某个槽位授予的技能
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlottedAbility {
    pub slot: ItemSlot,
    pub ability: String,
    pub level: i32,
}

/// 由槽位内容推出来的技能与武器，槽位变化后整体重算
#[derive(Component, Debug, Clone, Default, PartialEq, Eq)]
pub struct Loadout {
    pub abilities: Vec<SlottedAbility>,
    /// 序号最小的、带 actor 的武器槽
    pub weapon_actor: Option<String>,
}

impl Loadout {
    pub fn from_inventory(inventory: &InventoryController) -> Self {
        let mut loadout = Loadout::default();
        for (slot, key) in inventory.slot_table().iter() {
            if key.is_empty() {
                continue;
            }
            let Some(def) = inventory.catalog().get(key, slot.category) else {
                continue;
            };

            if let Some(ability) = &def.granted_ability {
                // ability_level <= 0 时跟随物品等级
                let level = if def.ability_level > 0 {
                    def.ability_level
                } else {
                    inventory.entry(key).map_or(1, |e| e.level)
                };
                loadout.abilities.push(SlottedAbility {
                    slot,
                    ability: ability.clone(),
                    level,
                });
            }

            if slot.category == ItemCategory::Weapon && loadout.weapon_actor.is_none() {
                loadout.weapon_actor = def.weapon_actor.clone();
            }
        }
        loadout
    }
}
