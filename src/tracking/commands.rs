use tauri::State;

use crate::{tracking::ScrollGeometry, AppState};

/// Start tracking a report view. `enabled: Some(false)` turns tracking off
/// for this view (previews); None falls back to the saved preference.
#[tauri::command]
pub async fn open_report_view(
    state: State<'_, AppState>,
    report_id: String,
    enabled: Option<bool>,
    user_agent: Option<String>,
) -> Result<(), String> {
    let enabled = enabled.unwrap_or_else(|| state.settings.tracking_enabled());
    state
        .tracking
        .open_report_view(report_id, enabled, user_agent)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn report_scroll_changed(
    state: State<'_, AppState>,
    scroll_top: f64,
    viewport_height: f64,
    document_height: f64,
) -> Result<(), String> {
    state
        .tracking
        .record_scroll(ScrollGeometry {
            scroll_top,
            viewport_height,
            document_height,
        })
        .await;
    Ok(())
}

#[tauri::command]
pub async fn report_view_hidden(state: State<'_, AppState>) -> Result<(), String> {
    state.tracking.view_hidden().await;
    Ok(())
}

#[tauri::command]
pub async fn close_report_view(state: State<'_, AppState>) -> Result<(), String> {
    state.tracking.close_report_view().await;
    Ok(())
}
