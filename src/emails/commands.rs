use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use crate::{
    db::models::{EmailStatus, GeneratedEmail, GeneratedEmailInput},
    emails::{summarize_campaigns, CampaignStats},
    AppState,
};

/// Ingest one generated email from the workflow engine's webhook output.
/// Always lands as a Draft for review.
#[tauri::command]
pub async fn store_generated_email(
    state: State<'_, AppState>,
    input: GeneratedEmailInput,
) -> Result<GeneratedEmail, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;

    // The lead lookup doubles as the ownership check.
    state
        .db
        .get_lead(&account_id, &input.lead_id)
        .await
        .map_err(|e| e.to_string())?;

    let now = Utc::now();
    let email = GeneratedEmail {
        id: Uuid::new_v4().to_string(),
        account_id,
        lead_id: input.lead_id,
        campaign: input.campaign,
        subject: input.subject,
        body_markdown: input.body_markdown,
        status: EmailStatus::Draft,
        generated_at: now,
        sent_at: None,
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .insert_generated_email(&email)
        .await
        .map_err(|e| e.to_string())?;

    Ok(email)
}

#[tauri::command]
pub async fn get_generated_email(
    state: State<'_, AppState>,
    email_id: String,
) -> Result<GeneratedEmail, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .get_generated_email(&account_id, &email_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_emails(state: State<'_, AppState>) -> Result<Vec<GeneratedEmail>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .list_emails(&account_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_emails_for_lead(
    state: State<'_, AppState>,
    lead_id: String,
) -> Result<Vec<GeneratedEmail>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .list_emails_for_lead(&account_id, &lead_id)
        .await
        .map_err(|e| e.to_string())
}

/// Autosave target for the email editor. Only drafts are editable.
#[tauri::command]
pub async fn update_email_body(
    state: State<'_, AppState>,
    email_id: String,
    subject: Option<String>,
    body_markdown: Option<String>,
) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;

    let email = state
        .db
        .get_generated_email(&account_id, &email_id)
        .await
        .map_err(|e| e.to_string())?;
    if email.status != EmailStatus::Draft {
        return Err(format!(
            "only drafts can be edited (status is {})",
            email.status.as_str()
        ));
    }

    state
        .db
        .update_email_body(&account_id, &email_id, subject, body_markdown)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn approve_email(state: State<'_, AppState>, email_id: String) -> Result<(), String> {
    transition_email(&state, &email_id, EmailStatus::Approved).await
}

/// Hand the email to the external delivery service.
#[tauri::command]
pub async fn begin_email_send(state: State<'_, AppState>, email_id: String) -> Result<(), String> {
    transition_email(&state, &email_id, EmailStatus::Sending).await
}

/// Callback once the delivery service reports a result.
#[tauri::command]
pub async fn complete_email_send(
    state: State<'_, AppState>,
    email_id: String,
    success: bool,
) -> Result<(), String> {
    let status = if success {
        EmailStatus::Sent
    } else {
        EmailStatus::Failed
    };
    transition_email(&state, &email_id, status).await
}

async fn transition_email(
    state: &State<'_, AppState>,
    email_id: &str,
    next: EmailStatus,
) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;

    let email = state
        .db
        .get_generated_email(&account_id, email_id)
        .await
        .map_err(|e| e.to_string())?;

    if !email.status.can_transition_to(next) {
        return Err(format!(
            "illegal email transition {} -> {}",
            email.status.as_str(),
            next.as_str()
        ));
    }

    let sent_at = match next {
        EmailStatus::Sent => Some(Utc::now()),
        _ => email.sent_at,
    };

    state
        .db
        .mark_email_status(&account_id, email_id, next, sent_at)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_generated_email(
    state: State<'_, AppState>,
    email_id: String,
) -> Result<(), String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    state
        .db
        .delete_generated_email(&account_id, &email_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_campaign_stats(state: State<'_, AppState>) -> Result<Vec<CampaignStats>, String> {
    let account_id = state.settings.require_account_id().map_err(|e| e.to_string())?;
    let emails = state
        .db
        .list_emails(&account_id)
        .await
        .map_err(|e| e.to_string())?;

    Ok(summarize_campaigns(&emails))
}
