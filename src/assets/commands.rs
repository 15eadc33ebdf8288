use chrono::Utc;
use tauri::State;
use tauri_plugin_opener::OpenerExt;
use uuid::Uuid;

use crate::{
    db::models::{Asset, AssetInput},
    AppState,
};

#[tauri::command]
pub async fn create_asset(state: State<'_, AppState>, input: AssetInput) -> Result<Asset, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    let now = Utc::now();

    let asset = Asset {
        id: Uuid::new_v4().to_string(),
        account_id,
        name: input.name,
        kind: input.kind,
        url: input.url,
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .insert_asset(&asset)
        .await
        .map_err(|e| e.to_string())?;

    Ok(asset)
}

#[tauri::command]
pub async fn list_assets(state: State<'_, AppState>) -> Result<Vec<Asset>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .list_assets(&account_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_asset(
    state: State<'_, AppState>,
    asset_id: String,
    name: Option<String>,
    url: Option<String>,
) -> Result<Asset, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .update_asset(&account_id, &asset_id, name, url)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_asset(state: State<'_, AppState>, asset_id: String) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .delete_asset(&account_id, &asset_id)
        .await
        .map_err(|e| e.to_string())
}

/// Open the asset's hosted URL with the system handler.
#[tauri::command]
pub async fn open_asset(
    state: State<'_, AppState>,
    app_handle: tauri::AppHandle,
    asset_id: String,
) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    let asset = state
        .db
        .get_asset(&account_id, &asset_id)
        .await
        .map_err(|e| e.to_string())?;

    app_handle
        .opener()
        .open_url(asset.url, None::<&str>)
        .map_err(|e| e.to_string())
}
