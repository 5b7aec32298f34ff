//! 运行配置：`config/game.toml`，缺省时全部取默认值

use bevy::prelude::*;
use serde_derive::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 覆盖配置路径的环境变量
pub const CONFIG_ENV: &str = "RPG_INVENTORY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/game.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Resource, Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub assets: AssetsConfig,
    pub log: LogConfig,
    pub cli: CliConfig,
    pub runner: RunnerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// 资产根目录
    pub root: String,
    /// 相对 root 的目录文件
    pub catalog: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "assets".into(),
            catalog: "data/items.catalog.ron".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// tracing EnvFilter 语法；RUST_LOG 优先
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info,wgpu=error".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub enabled: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub tick_hz: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self { tick_hz: 60.0 }
    }
}

impl GameConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// 文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// 环境变量优先，其次默认路径
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// 每帧间隔；tick_hz 非正时退回 60
    pub fn tick_interval(&self) -> std::time::Duration {
        let hz = if self.runner.tick_hz > 0.0 {
            self.runner.tick_hz
        } else {
            60.0
        };
        std::time::Duration::from_secs_f64(1.0 / hz)
    }
}
