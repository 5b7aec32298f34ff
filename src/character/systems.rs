use super::components::*;
use crate::core::events::LogEvent;
use crate::data::catalog::CatalogResource;
use crate::inventory::controller::{InventoryController, InventorySource};
use crate::inventory::events::{InventoryLoaded, SlotChanged};
use crate::inventory::notify::NotificationQueue;
use bevy::prelude::*;

/// 让 CLI 打印当前技能与武器
#[derive(Event, Debug, Clone, Default)]
pub struct ShowLoadout;

/// 初始化玩家实体：挂上背包，接好通知转发，再按目录初始化
pub fn spawn_player(
    mut commands: Commands,
    catalog: Res<CatalogResource>,
    queue: Res<NotificationQueue>,
) {
    let mut inventory = InventoryController::new(catalog.0.clone());
    queue.attach(inventory.notifier_mut());
    inventory.initialize();

    let loadout = Loadout::from_inventory(&inventory);
    commands.spawn((Player, inventory, loadout));
}

/// 槽位一变就重算 Loadout
pub fn refresh_loadout(
    mut ev_slot: EventReader<SlotChanged>,
    mut ev_loaded: EventReader<InventoryLoaded>,
    mut players: Query<(&InventoryController, &mut Loadout), With<Player>>,
) {
    let dirty = ev_slot.read().count() + ev_loaded.read().count() > 0;
    if !dirty {
        return;
    }

    for (inventory, mut loadout) in &mut players {
        let fresh = Loadout::from_inventory(inventory);
        if *loadout != fresh {
            debug!(
                "Loadout: {} 个技能，武器 {:?}",
                fresh.abilities.len(),
                fresh.weapon_actor
            );
            *loadout = fresh;
        }
    }
}

pub fn show_loadout(
    mut ev_show: EventReader<ShowLoadout>,
    mut ev_log: EventWriter<LogEvent>,
    players: Query<&Loadout, With<Player>>,
) {
    if ev_show.is_empty() {
        return;
    }
    ev_show.clear();

    let Ok(loadout) = players.single() else {
        ev_log.write(LogEvent("未找到玩家".to_string()));
        return;
    };
    ev_log.write(LogEvent(format!(
        "武器 actor: {}",
        loadout.weapon_actor.as_deref().unwrap_or("-")
    )));
    for a in &loadout.abilities {
        ev_log.write(LogEvent(format!("{}: {} lv{}", a.slot, a.ability, a.level)));
    }
}
