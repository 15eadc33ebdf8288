use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use crate::{
    db::models::{Lead, LeadInput, LeadOverview, LeadStage},
    leads::classify_temperature,
    AppState,
};

#[tauri::command]
pub async fn create_lead(state: State<'_, AppState>, input: LeadInput) -> Result<Lead, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    let now = Utc::now();

    let lead = Lead {
        id: Uuid::new_v4().to_string(),
        account_id,
        name: input.name,
        email: input.email,
        company: input.company,
        role: input.role,
        stage: LeadStage::New,
        notes: input.notes,
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .insert_lead(&lead)
        .await
        .map_err(|e| e.to_string())?;

    Ok(lead)
}

#[tauri::command]
pub async fn get_lead(state: State<'_, AppState>, lead_id: String) -> Result<Lead, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .get_lead(&account_id, &lead_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_leads(state: State<'_, AppState>) -> Result<Vec<LeadOverview>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    let leads = state
        .db
        .list_leads(&account_id)
        .await
        .map_err(|e| e.to_string())?;

    overviews_for(&state, &account_id, leads).await
}

#[tauri::command]
pub async fn list_leads_paginated(
    state: State<'_, AppState>,
    limit: usize,
    offset: usize,
) -> Result<Vec<LeadOverview>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    let leads = state
        .db
        .list_leads_paginated(&account_id, limit, offset)
        .await
        .map_err(|e| e.to_string())?;

    overviews_for(&state, &account_id, leads).await
}

/// Enrich each lead with its best engagement and the derived temperature.
async fn overviews_for(
    state: &State<'_, AppState>,
    account_id: &str,
    leads: Vec<Lead>,
) -> Result<Vec<LeadOverview>, String> {
    let now = Utc::now();
    let mut overviews = Vec::new();
    for lead in leads {
        let engagement = state
            .db
            .get_lead_engagement(account_id, &lead.id)
            .await
            .map_err(|e| e.to_string())?;

        overviews.push(LeadOverview {
            temperature: classify_temperature(now, engagement.as_ref()),
            last_engaged_at: engagement.as_ref().map(|e| e.last_engaged_at),
            best_scroll_depth: engagement.as_ref().map(|e| e.best_scroll_depth),
            best_duration_seconds: engagement.as_ref().map(|e| e.best_duration_seconds),
            id: lead.id,
            name: lead.name,
            email: lead.email,
            company: lead.company,
            stage: lead.stage,
        });
    }

    Ok(overviews)
}

#[tauri::command]
pub async fn update_lead(
    state: State<'_, AppState>,
    lead_id: String,
    name: Option<String>,
    email: Option<String>,
    company: Option<String>,
    role: Option<String>,
    notes: Option<String>,
) -> Result<Lead, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .update_lead(&account_id, &lead_id, name, email, company, role, notes)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_lead_stage(
    state: State<'_, AppState>,
    lead_id: String,
    stage: LeadStage,
) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .update_lead_stage(&account_id, &lead_id, stage)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_lead(state: State<'_, AppState>, lead_id: String) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .delete_lead(&account_id, &lead_id)
        .await
        .map_err(|e| e.to_string())
}
