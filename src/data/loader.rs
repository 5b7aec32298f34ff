use bevy::asset::{AssetLoader, LoadContext, io::Reader, ron};
use bevy::prelude::*;
use std::future::Future;
use thiserror::Error;

use super::schema::CatalogFile;

#[derive(Default)]
pub struct RonCatalogLoader;

#[derive(Debug, Error)]
pub enum RonCatalogLoaderError {
    #[error("Could not load catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Could not interpret bytes as UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// 字节 → CatalogFile；测试里也直接用
pub fn parse_catalog(bytes: &[u8]) -> Result<CatalogFile, RonCatalogLoaderError> {
    let s = std::str::from_utf8(bytes)?;
    Ok(ron::de::from_str(s)?)
}

impl AssetLoader for RonCatalogLoader {
    type Asset = CatalogFile;
    type Settings = ();
    type Error = RonCatalogLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl Future<Output = Result<Self::Asset, Self::Error>> + Send {
        let path = load_context.path().display().to_string();
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;

            let file = parse_catalog(&bytes)?;
            debug!("解析目录 {path}: {} 条开局物品", file.default_inventory.len());
            Ok(file)
        }
    }

    fn extensions(&self) -> &[&str] {
        &["catalog.ron"]
    }
}
