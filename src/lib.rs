mod assets;
mod db;
mod emails;
mod leads;
mod metrics;
mod reports;
mod settings;
mod tracking;

use std::sync::Arc;

use assets::commands::{create_asset, delete_asset, list_assets, open_asset, update_asset};
use chrono::Utc;
use db::Database;
use emails::commands::{
    approve_email, begin_email_send, complete_email_send, delete_generated_email,
    get_campaign_stats, get_generated_email, list_emails, list_emails_for_lead,
    store_generated_email, update_email_body,
};
use leads::commands::{
    create_lead, delete_lead, get_lead, list_leads, list_leads_paginated, update_lead,
    update_lead_stage,
};
use log::warn;
use metrics::commands::get_dashboard_kpis;
use reports::commands::{
    delete_report, get_report, get_report_engagement, list_report_viewers, list_reports,
    list_reports_for_lead, store_generated_report, update_report,
};
use settings::{AccountProfile, SettingsStore};
use tauri::{Manager, State};
use tracking::commands::{
    close_report_view, open_report_view, report_scroll_changed, report_view_hidden,
};
use tracking::{TrackingController, VisitorIdStore};

pub(crate) struct AppState {
    pub(crate) db: Database,
    pub(crate) settings: SettingsStore,
    pub(crate) tracking: TrackingController,
}

#[tauri::command]
fn get_active_account(state: State<AppState>) -> Result<Option<AccountProfile>, String> {
    Ok(state.settings.account())
}

#[tauri::command]
fn set_active_account(
    account: Option<AccountProfile>,
    state: State<AppState>,
) -> Result<(), String> {
    state
        .settings
        .update_account(account)
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn get_tracking_preference(state: State<AppState>) -> Result<bool, String> {
    Ok(state.settings.tracking_enabled())
}

#[tauri::command]
fn set_tracking_preference(enabled: bool, state: State<AppState>) -> Result<(), String> {
    state
        .settings
        .set_tracking_enabled(enabled)
        .map_err(|e| e.to_string())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("OutreachDesk starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let db_path = app_data_dir.join("outreachdesk.sqlite3");
                let database = Database::new(db_path)?;

                // Finalize emails that were mid-send when the app last crashed.
                {
                    let db_for_recovery = database.clone();
                    tauri::async_runtime::block_on(async move {
                        let recovered = db_for_recovery
                            .recover_stuck_sending_emails(Utc::now())
                            .await?;
                        if recovered > 0 {
                            warn!("Recovered {recovered} emails stuck in Sending; marked as Failed");
                        }
                        Ok::<(), anyhow::Error>(())
                    })?;
                }

                let visitor_store = Arc::new(VisitorIdStore::new(&app_data_dir));
                let tracking_controller =
                    TrackingController::new(app.handle().clone(), database.clone(), visitor_store);

                let settings_path = app_data_dir.join("settings.json");
                let settings_store = SettingsStore::new(settings_path)?;

                app.manage(AppState {
                    db: database,
                    settings: settings_store,
                    tracking: tracking_controller,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            create_lead,
            get_lead,
            list_leads,
            list_leads_paginated,
            update_lead,
            update_lead_stage,
            delete_lead,
            store_generated_email,
            get_generated_email,
            list_emails,
            list_emails_for_lead,
            update_email_body,
            approve_email,
            begin_email_send,
            complete_email_send,
            delete_generated_email,
            get_campaign_stats,
            store_generated_report,
            get_report,
            list_reports,
            list_reports_for_lead,
            update_report,
            delete_report,
            list_report_viewers,
            get_report_engagement,
            create_asset,
            list_assets,
            update_asset,
            delete_asset,
            open_asset,
            open_report_view,
            report_scroll_changed,
            report_view_hidden,
            close_report_view,
            get_dashboard_kpis,
            get_active_account,
            set_active_account,
            get_tracking_preference,
            set_tracking_preference,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
