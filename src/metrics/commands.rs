use chrono::Utc;
use tauri::State;

use crate::{
    metrics::{email_counts, summarize_engagement, temperature_breakdown, DashboardKpis},
    AppState,
};

#[tauri::command]
pub async fn get_dashboard_kpis(state: State<'_, AppState>) -> Result<DashboardKpis, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    let db = &state.db;

    let leads = db.list_leads(&account_id).await.map_err(|e| e.to_string())?;

    let mut engagements = Vec::with_capacity(leads.len());
    for lead in &leads {
        let engagement = db
            .get_lead_engagement(&account_id, &lead.id)
            .await
            .map_err(|e| e.to_string())?;
        engagements.push(engagement);
    }

    let emails = db.list_emails(&account_id).await.map_err(|e| e.to_string())?;
    let reports = db.list_reports(&account_id).await.map_err(|e| e.to_string())?;
    let viewer_pairs = db
        .get_account_viewer_engagement(&account_id)
        .await
        .map_err(|e| e.to_string())?;

    Ok(DashboardKpis {
        total_leads: leads.len() as u64,
        temperature: temperature_breakdown(Utc::now(), &engagements),
        emails: email_counts(&emails),
        reports_generated: reports.len() as u64,
        engagement: summarize_engagement(&viewer_pairs),
    })
}
