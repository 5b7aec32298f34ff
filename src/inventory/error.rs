use thiserror::Error;

use crate::data::schema::ItemCategory;

/// 背包操作被拒绝的原因；调用方只关心 bool 时由控制器记日志后吞掉
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("item key is empty")]
    EmptyKey,

    #[error("item {0} has no category")]
    UndefinedCategory(String),

    #[error("item {key}: count must be positive (got {count})")]
    NonPositiveCount { key: String, count: i32 },

    #[error("item {key}: level must be positive (got {level})")]
    NonPositiveLevel { key: String, level: i32 },

    #[error("item {key} is not in the {category} catalog")]
    UnknownItem { key: String, category: ItemCategory },

    #[error("item {0} is not in the inventory")]
    NotOwned(String),
}
