use super::events::*;
use crate::character::components::Player;
use crate::core::events::LogEvent;
use crate::inventory::controller::InventoryController;
use bevy::prelude::*;

pub fn equip_item(
    mut ev_equip: EventReader<EquipEvent>,
    mut inventories: Query<&mut InventoryController, With<Player>>,
    mut log_event: EventWriter<LogEvent>,
) {
    let Ok(mut inventory) = inventories.single_mut() else {
        ev_equip.clear();
        return;
    };

    for ev in ev_equip.read() {
        // 检查槽位是否有效
        if !inventory.catalog().is_valid_item_slot(ev.slot) {
            log_event.write(LogEvent(format!("未知槽位: {}", ev.slot)));
            continue;
        }
        // 只能装背包里有的东西，且大类要对得上
        match inventory.entry(&ev.key) {
            Some(entry) if entry.category == ev.slot.category => {}
            Some(entry) => {
                log_event.write(LogEvent(format!(
                    "{} 是 {}，放不进 {}",
                    ev.key, entry.category, ev.slot
                )));
                continue;
            }
            None => {
                log_event.write(LogEvent(format!("背包里没有 {}", ev.key)));
                continue;
            }
        }

        if inventory.set_slot(ev.slot, &ev.key) {
            log_event.write(LogEvent(format!("已装备 {}: {}", ev.slot, ev.key)));
        }
    }
}

/// 卸下装备
pub fn unequip_item(
    mut ev_unequip: EventReader<UnequipEvent>,
    mut inventories: Query<&mut InventoryController, With<Player>>,
    mut log_event: EventWriter<LogEvent>,
) {
    let Ok(mut inventory) = inventories.single_mut() else {
        ev_unequip.clear();
        return;
    };

    for ev in ev_unequip.read() {
        let (current, _) = inventory.slotted_item(ev.slot);
        if current.is_empty() {
            log_event.write(LogEvent(format!("{} 本来就是空的", ev.slot)));
            continue;
        }
        let current = current.to_string();
        if inventory.set_slot(ev.slot, "") {
            log_event.write(LogEvent(format!("已卸下 {}: {current}", ev.slot)));
        }
    }
}

pub fn print_slots(
    mut ev_list: EventReader<ListSlotsEvent>,
    inventories: Query<&InventoryController, With<Player>>,
    mut log_event: EventWriter<LogEvent>,
) {
    let Ok(inventory) = inventories.single() else {
        ev_list.clear();
        return;
    };

    for ev in ev_list.read() {
        let slots = inventory.matching_slots(ev.category, ev.include_empty);
        if slots.is_empty() {
            log_event.write(LogEvent("  (no slots)".to_string()));
        }
        for (slot, key) in slots {
            let line = match inventory.slotted_item(slot) {
                (_, Some(def)) => format!("{slot}: {} ({key})", def.name),
                _ if key.is_empty() => format!("{slot}: -"),
                _ => format!("{slot}: {key}"),
            };
            log_event.write(LogEvent(line));
        }
    }
}
