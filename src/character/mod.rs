pub mod components;
pub mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use systems::*;

pub struct CharacterPlugin;

impl Plugin for CharacterPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ShowLoadout>()
            // 在游戏开始时生成玩家
            .add_systems(OnEnter(AppState::InGame), spawn_player)
            .add_systems(
                Update,
                show_loadout.run_if(in_state(AppState::InGame)),
            )
            // 通知在 PostUpdate 转成事件，之后再重算
            .add_systems(Last, refresh_loadout);
    }
}
