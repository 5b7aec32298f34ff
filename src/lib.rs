//! 动作 RPG 的背包核心：物品目录、背包账本、槽位表、自动上槽与变更通知，
//! 外加把它们接进 Bevy 的插件。

pub mod character;
pub mod core;
pub mod data;
pub mod equipment;
pub mod interface;
pub mod inventory;

pub use data::catalog::ItemCatalog;
pub use data::schema::{InventoryEntry, ItemCategory, ItemDefinition, ItemSlot};
pub use inventory::controller::{InventoryController, InventorySnapshot, InventorySource};
pub use inventory::error::InventoryError;
