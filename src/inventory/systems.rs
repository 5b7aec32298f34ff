use super::{controller::InventoryController, events::*, notify::*};
use crate::character::components::Player;
use crate::core::events::LogEvent;
use crate::data::catalog::CatalogResource;
use bevy::prelude::*;

/// 处理 "give"：大类未给出时按目录查找顺序定
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut inventories: Query<&mut InventoryController, With<Player>>,
    mut log_event: EventWriter<LogEvent>,
) {
    let Ok(mut inventory) = inventories.single_mut() else {
        ev_give.clear();
        return;
    };

    for ev in ev_give.read() {
        let category = if ev.category.is_defined() {
            ev.category
        } else {
            match inventory.catalog().find_item(&ev.key) {
                Some((category, _)) => category,
                None => {
                    log_event.write(LogEvent(format!("不存在物品 {}", ev.key)));
                    continue;
                }
            }
        };

        let before = inventory.count(&ev.key);
        match inventory.try_add_item(&ev.key, category, ev.count, ev.level, true) {
            Ok(true) => {
                let name = inventory
                    .catalog()
                    .definition_or_default(&ev.key, category)
                    .name;
                let after = inventory.count(&ev.key);
                let line = if after > before {
                    format!("获得 {name} ×{}（现有 {after}）", after - before)
                } else {
                    format!("{name} 已更新（现有 {after}）")
                };
                log_event.write(LogEvent(line));
            }
            Ok(false) => {
                log_event.write(LogEvent(format!("{} 已达上限，没有变化", ev.key)));
            }
            Err(e) => {
                warn!("give_item: {e}");
                log_event.write(LogEvent(e.to_string()));
            }
        }
    }
}

pub fn remove_item(
    mut ev_remove: EventReader<RemoveItemEvent>,
    mut inventories: Query<&mut InventoryController, With<Player>>,
    mut log_event: EventWriter<LogEvent>,
) {
    let Ok(mut inventory) = inventories.single_mut() else {
        ev_remove.clear();
        return;
    };

    for ev in ev_remove.read() {
        if inventory.remove_item(&ev.key, ev.count) {
            log_event.write(LogEvent(format!(
                "移除 {}，剩余 {}",
                ev.key,
                inventory.count(&ev.key)
            )));
        } else {
            log_event.write(LogEvent(format!("背包里没有 {}", ev.key)));
        }
    }
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    inventories: Query<&InventoryController, With<Player>>,
    mut log_event: EventWriter<LogEvent>,
) {
    let Ok(inventory) = inventories.single() else {
        ev_list.clear();
        return;
    };

    for ev in ev_list.read() {
        let keys = inventory.owned_keys(ev.category);
        if keys.is_empty() {
            log_event.write(LogEvent("  (empty)".to_string()));
            continue;
        }
        for key in keys {
            let Some(entry) = inventory.entry(&key) else {
                continue;
            };
            let name = inventory
                .catalog()
                .definition_or_default(&key, entry.category)
                .name;
            log_event.write(LogEvent(format!(
                "[{}] {name} ×{} lv{} (key={key})",
                entry.category, entry.count, entry.level
            )));
        }
    }
}

pub fn fill_slots(
    mut ev_fill: EventReader<FillSlotsEvent>,
    mut inventories: Query<&mut InventoryController, With<Player>>,
) {
    if ev_fill.is_empty() {
        return;
    }
    ev_fill.clear();

    for mut inventory in &mut inventories {
        inventory.fill_empty_slots();
    }
}

/// 用当前目录资源重建背包
pub fn reload_inventory(
    mut ev_reload: EventReader<ReloadInventoryEvent>,
    catalog: Res<CatalogResource>,
    mut inventories: Query<&mut InventoryController, With<Player>>,
    mut log_event: EventWriter<LogEvent>,
) {
    if ev_reload.is_empty() {
        return;
    }
    ev_reload.clear();

    for mut inventory in &mut inventories {
        inventory.reload(catalog.0.clone());
    }
    log_event.write(LogEvent("背包已重建".to_string()));
}

pub fn dump_inventory(
    mut ev_dump: EventReader<DumpInventoryEvent>,
    inventories: Query<&InventoryController, With<Player>>,
    mut log_event: EventWriter<LogEvent>,
) {
    if ev_dump.is_empty() {
        return;
    }
    ev_dump.clear();

    for inventory in &inventories {
        match serde_json::to_string_pretty(&inventory.snapshot()) {
            Ok(json) => {
                log_event.write(LogEvent(json));
            }
            Err(e) => warn!("快照序列化失败: {e}"),
        }
    }
}

/// 把控制器里攒下的通知转成 Bevy 事件
pub fn forward_notifications(
    queue: Res<NotificationQueue>,
    mut item_changed: EventWriter<ItemChanged>,
    mut slot_changed: EventWriter<SlotChanged>,
    mut loaded: EventWriter<InventoryLoaded>,
) {
    for notice in queue.drain() {
        match notice {
            InventoryNotice::ItemChanged(ev) => {
                debug!(
                    "{} {} ({})",
                    if ev.added { "+" } else { "-" },
                    ev.key,
                    ev.category
                );
                item_changed.write(ev);
            }
            InventoryNotice::SlotChanged(ev) => {
                debug!("槽位 {} ← {:?}", ev.slot, ev.key);
                slot_changed.write(ev);
            }
            InventoryNotice::Loaded => {
                loaded.write(InventoryLoaded);
            }
        }
    }
}
