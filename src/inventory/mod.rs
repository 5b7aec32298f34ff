pub mod controller;
pub mod error;
pub mod events;
pub mod ledger;
pub mod notify;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use events::*;
use notify::NotificationQueue;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NotificationQueue>()
            // 请求
            .add_event::<GiveItemEvent>()
            .add_event::<RemoveItemEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<FillSlotsEvent>()
            .add_event::<ReloadInventoryEvent>()
            .add_event::<DumpInventoryEvent>()
            // 通知
            .add_event::<ItemChanged>()
            .add_event::<SlotChanged>()
            .add_event::<InventoryLoaded>()
            .add_systems(
                Update,
                (
                    give_item,
                    remove_item,
                    fill_slots,
                    reload_inventory,
                    print_inventory,
                    dump_inventory,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            )
            // 不挂状态条件：OnEnter 里初始化产生的通知也要转出去
            .add_systems(PostUpdate, forward_notifications);
    }
}
