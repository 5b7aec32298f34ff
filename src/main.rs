use anyhow::Context;
use bevy::app::ScheduleRunnerPlugin;
use bevy::asset::AssetPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use rpg_inventory::character::CharacterPlugin;
use rpg_inventory::core::{CorePlugin, events::LogEvent, resources::GameConfig};
use rpg_inventory::data::DataPlugin;
use rpg_inventory::equipment::EquipmentPlugin;
use rpg_inventory::interface::debug_cli::DebugCliPlugin;
use rpg_inventory::inventory::InventoryPlugin;

fn main() -> anyhow::Result<()> {
    let path = GameConfig::config_path();
    let config = GameConfig::load(&path)
        .with_context(|| format!("读取配置 {} 失败", path.display()))?;

    let mut app = App::new();
    // 无窗口：固定频率跑主循环
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(config.tick_interval())),
        AssetPlugin {
            file_path: config.assets.root.clone(),
            ..default()
        },
        LogPlugin {
            filter: config.log.filter.clone(),
            ..default()
        },
        StatesPlugin,
    ))
    .add_plugins(CorePlugin {
        config: config.clone(),
    })
    .add_plugins((DataPlugin, InventoryPlugin, EquipmentPlugin, CharacterPlugin))
    .add_systems(Update, forward_log_event); // 简单打印

    if config.cli.enabled {
        app.add_plugins(DebugCliPlugin);
    }

    app.run();
    Ok(())
}

fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
