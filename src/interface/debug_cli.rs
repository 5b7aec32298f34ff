//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use bevy::app::AppExit;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::character::{components::Player, systems::ShowLoadout};
use crate::core::{events::LogEvent, states::AppState};
use crate::data::{
    catalog::{CatalogResource, ItemCatalog},
    schema::{ItemCategory, ItemDefinition, ItemSlot},
};
use crate::equipment::events::{EquipEvent, ListSlotsEvent, UnequipEvent};
use crate::inventory::{controller::InventoryController, events::*};

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Ok(mut buf) = buffer.lock() {
                        buf.push_back(line.to_string());
                    }
                }
            });
        }
        app
            // 事件：原始输入行
            .add_event::<CliLine>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, read_stdin)
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                execute_cli_commands
                    .after(read_stdin)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event)]
struct CliLine(String);

/// 我们支持的命令
#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按 key/uuid/name 查询
    Give { key: String, count: i32, level: i32 },
    Remove { key: String, count: i32 },
    Inventory(ItemCategory),
    Slots { category: ItemCategory, include_empty: bool },
    Equip { slot: ItemSlot, key: String },
    Unequip(ItemSlot),
    Fill,
    Reload,
    Dump,
    Loadout,
    Usage(&'static str),
    Unsupported(String),
}

/// 命令转发到各插件的请求事件
#[derive(SystemParam)]
struct Requests<'w> {
    give: EventWriter<'w, GiveItemEvent>,
    remove: EventWriter<'w, RemoveItemEvent>,
    list: EventWriter<'w, ListInventoryEvent>,
    fill: EventWriter<'w, FillSlotsEvent>,
    reload: EventWriter<'w, ReloadInventoryEvent>,
    dump: EventWriter<'w, DumpInventoryEvent>,
    slots: EventWriter<'w, ListSlotsEvent>,
    equip: EventWriter<'w, EquipEvent>,
    unequip: EventWriter<'w, UnequipEvent>,
    loadout: EventWriter<'w, ShowLoadout>,
}

const HELP: &str = "命令列表:
  help                              查看帮助
  status                            查看当前状态
  exit / quit                       退出程序
  items                             列出所有物品
  items <token>                     用 key / uuid / 名称 查询单个物品
  give <key> [count] [level]        给予物品（自动上槽）
  remove <key> [count]              移除物品，count 省略或 <= 0 表示全部
  inventory [category]              查看物品栏
  slots [category] [all]            查看槽位，all 连空位一起列
  equip <category> <index> <key>    放进槽位
  unequip <category> <index>        清空槽位
  fill                              用背包物品补满空槽
  reload                            按目录重建背包
  dump                              以 JSON 打印背包快照
  loadout                           查看槽位授予的技能与武器";

/* ---------------------------- 读取 stdin ---------------------------- */

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let Ok(mut buffer) = CLI_BUFFER.lock() else {
        return;
    };
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

fn execute_cli_commands(
    mut line_reader: EventReader<CliLine>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    catalog: Option<Res<CatalogResource>>,
    inventories: Query<&InventoryController, With<Player>>,
    mut requests: Requests,
) {
    for CliLine(input) in line_reader.read() {
        match parse_command(input) {
            Command::Help => {
                log.write(LogEvent(HELP.into()));
            }

            Command::Status => {
                let cnt = catalog.as_ref().map_or(0, |c| c.0.len());
                log.write(LogEvent(format!(
                    "State: {:?}, Items Loaded: {}",
                    state.get(),
                    cnt
                )));
                if let Ok(inventory) = inventories.single() {
                    log.write(LogEvent(inventory.summary()));
                }
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Success);
            }

            Command::Items(token) => {
                let Some(catalog) = catalog.as_ref() else {
                    log.write(LogEvent("目录尚未加载".into()));
                    continue;
                };
                match token {
                    None => {
                        // 全部列出
                        for (key, def) in catalog.0.definitions(ItemCategory::Undefined) {
                            log.write(LogEvent(format!(
                                "{} | {} | {key} | {}",
                                uuid_from_key(key),
                                def.category,
                                def.name
                            )));
                        }
                    }
                    Some(t) => match lookup(&catalog.0, &t) {
                        Some((key, def)) => {
                            log.write(LogEvent(describe(key, def)));
                        }
                        None => {
                            log.write(LogEvent("未找到匹配物品".into()));
                        }
                    },
                }
            }

            Command::Give { key, count, level } => {
                requests.give.write(GiveItemEvent {
                    key,
                    category: ItemCategory::Undefined,
                    count,
                    level,
                });
            }

            Command::Remove { key, count } => {
                requests.remove.write(RemoveItemEvent { key, count });
            }

            Command::Inventory(category) => {
                requests.list.write(ListInventoryEvent { category });
            }

            Command::Slots {
                category,
                include_empty,
            } => {
                requests.slots.write(ListSlotsEvent {
                    category,
                    include_empty,
                });
            }

            Command::Equip { slot, key } => {
                requests.equip.write(EquipEvent { slot, key });
            }

            Command::Unequip(slot) => {
                requests.unequip.write(UnequipEvent { slot });
            }

            Command::Fill => {
                requests.fill.write(FillSlotsEvent);
            }

            Command::Reload => {
                requests.reload.write(ReloadInventoryEvent);
            }

            Command::Dump => {
                requests.dump.write(DumpInventoryEvent);
            }

            Command::Loadout => {
                requests.loadout.write(ShowLoadout);
            }

            Command::Usage(usage) => {
                log.write(LogEvent(format!("用法: {usage}")));
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("不支持的命令: {cmd}")));
            }
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" | "q" => Command::Exit,
        "items" | "item" | "i" => {
            let token = parts.next().map(|s| s.to_string());
            Command::Items(token)
        }
        "give" => {
            let Some(key) = parts.next() else {
                return Command::Usage("give <key> [count] [level]");
            };
            let count = parts.next().unwrap_or("1").parse().unwrap_or(1);
            let level = parts.next().unwrap_or("1").parse().unwrap_or(1);
            Command::Give {
                key: key.to_string(),
                count,
                level,
            }
        }
        "remove" | "rm" => {
            let Some(key) = parts.next() else {
                return Command::Usage("remove <key> [count]");
            };
            let count = parts.next().unwrap_or("0").parse().unwrap_or(0);
            Command::Remove {
                key: key.to_string(),
                count,
            }
        }
        "inventory" | "inv" => match parts.next() {
            None => Command::Inventory(ItemCategory::Undefined),
            Some(name) => match ItemCategory::from_name(name) {
                Some(category) => Command::Inventory(category),
                None => Command::Usage("inventory [potion|skill|token|weapon|all]"),
            },
        },
        "slots" => {
            let mut category = ItemCategory::Undefined;
            let mut include_empty = false;
            // all 只表示连空位一起列；不写大类即全部大类
            for arg in parts {
                if arg.eq_ignore_ascii_case("all") {
                    include_empty = true;
                } else if let Some(c) = ItemCategory::from_name(arg) {
                    category = c;
                } else {
                    return Command::Usage("slots [category] [all]");
                }
            }
            Command::Slots {
                category,
                include_empty,
            }
        }
        "equip" => match (parse_slot(&mut parts), parts.next()) {
            (Some(slot), Some(key)) => Command::Equip {
                slot,
                key: key.to_string(),
            },
            _ => Command::Usage("equip <category> <index> <key>"),
        },
        "unequip" => match parse_slot(&mut parts) {
            Some(slot) => Command::Unequip(slot),
            None => Command::Usage("unequip <category> <index>"),
        },
        "fill" => Command::Fill,
        "reload" => Command::Reload,
        "dump" => Command::Dump,
        "loadout" => Command::Loadout,
        other => Command::Unsupported(other.into()),
    }
}

fn parse_slot<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Option<ItemSlot> {
    let category = ItemCategory::from_name(parts.next()?)?;
    let index = parts.next()?.parse().ok()?;
    Some(ItemSlot::new(category, index))
}

/// key / 名称不分大小写，也认 key 的 uuid
fn lookup<'c>(catalog: &'c ItemCatalog, token: &str) -> Option<(&'c str, &'c ItemDefinition)> {
    let t_low = token.to_lowercase();
    catalog
        .definitions(ItemCategory::Undefined)
        .into_iter()
        .find(|(key, def)| {
            key.eq_ignore_ascii_case(&t_low)
                || def.name.eq_ignore_ascii_case(&t_low)
                || uuid_from_key(key).to_string() == t_low
        })
}

fn describe(key: &str, def: &ItemDefinition) -> String {
    let limit = |v: i32| {
        if v <= 0 {
            "∞".to_string()
        } else {
            v.to_string()
        }
    };
    format!(
        "==================================================
UUID     : {}
Key      : {key}
Category : {}
Name     : {}
Price    : {}
MaxCount : {}
MaxLevel : {}
Ability  : {}
==================================================",
        uuid_from_key(key),
        def.category,
        def.name,
        def.price,
        limit(def.max_count),
        limit(def.max_level),
        def.granted_ability.as_deref().unwrap_or("-"),
    )
}

fn uuid_from_key(key: &str) -> Uuid {
    // 用固定 namespace + key 字节生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}
