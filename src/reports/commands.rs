use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use crate::{
    db::models::{Report, ReportEngagement, ReportInput, ViewerEngagement},
    reports::rollup_report_engagement,
    AppState,
};

/// Ingest one generated HTML report from the workflow engine's output.
#[tauri::command]
pub async fn store_generated_report(
    state: State<'_, AppState>,
    input: ReportInput,
) -> Result<Report, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;

    // The lead lookup doubles as the ownership check.
    state
        .db
        .get_lead(&account_id, &input.lead_id)
        .await
        .map_err(|e| e.to_string())?;

    let now = Utc::now();
    let report = Report {
        id: Uuid::new_v4().to_string(),
        account_id,
        lead_id: input.lead_id,
        title: input.title,
        html_body: input.html_body,
        generated_at: now,
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .insert_report(&report)
        .await
        .map_err(|e| e.to_string())?;

    Ok(report)
}

#[tauri::command]
pub async fn get_report(state: State<'_, AppState>, report_id: String) -> Result<Report, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .get_report(&account_id, &report_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_reports(state: State<'_, AppState>) -> Result<Vec<Report>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .list_reports(&account_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_reports_for_lead(
    state: State<'_, AppState>,
    lead_id: String,
) -> Result<Vec<Report>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .list_reports_for_lead(&account_id, &lead_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_report(
    state: State<'_, AppState>,
    report_id: String,
    title: Option<String>,
    html_body: Option<String>,
) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .update_report(&account_id, &report_id, title, html_body)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_report(state: State<'_, AppState>, report_id: String) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .delete_report(&account_id, &report_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_report_viewers(
    state: State<'_, AppState>,
    report_id: String,
) -> Result<Vec<ViewerEngagement>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .get_viewer_engagement_for_report(&account_id, &report_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_report_engagement(
    state: State<'_, AppState>,
    report_id: String,
) -> Result<ReportEngagement, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    let viewers = state
        .db
        .get_viewer_engagement_for_report(&account_id, &report_id)
        .await
        .map_err(|e| e.to_string())?;

    Ok(rollup_report_engagement(report_id, &viewers))
}
