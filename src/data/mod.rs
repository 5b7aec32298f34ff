pub mod catalog;
pub mod loader;
pub mod schema;

use bevy::asset::LoadState;
use bevy::prelude::*;
use std::sync::Arc;

use crate::core::{resources::GameConfig, states::AppState};
use catalog::{CatalogResource, ItemCatalog};
use schema::CatalogFile;

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct CatalogAssets {
    handle: Option<Handle<CatalogFile>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<CatalogFile>()
            .register_asset_loader(loader::RonCatalogLoader)
            .init_resource::<CatalogAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(
                Update,
                check_loaded.run_if(in_state(AppState::Loading)),
            );
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut catalog_assets: ResMut<CatalogAssets>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    info!("加载物品目录 {}", config.assets.catalog);
    let handle: Handle<CatalogFile> = asset_server.load(config.assets.catalog.clone());
    catalog_assets.handle = Some(handle);
}

/// 资产就绪后转成只读目录，切到 InGame
fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    mut catalog_assets: ResMut<CatalogAssets>,
    mut files: ResMut<Assets<CatalogFile>>,
    asset_server: Res<AssetServer>,
) {
    let Some(handle) = catalog_assets.handle.clone() else {
        return;
    };
    // 失败只报一次，停在 Loading
    if let LoadState::Failed(err) = asset_server.load_state(&handle) {
        error!("物品目录加载失败: {err}");
        catalog_assets.handle = None;
        return;
    }
    // 目录只用一次，直接取走
    let Some(file) = files.remove(&handle) else {
        return;
    };

    let catalog = ItemCatalog::from(file);
    for problem in catalog.validate() {
        warn!("目录检查: {problem}");
    }
    info!(
        "✔ Items loaded: {} (slot kinds: {})",
        catalog.len(),
        catalog.slots_per_category().len()
    );
    commands.insert_resource(CatalogResource(Arc::new(catalog)));
    next.set(AppState::InGame);
}
