//! Generated report data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub account_id: String,
    pub lead_id: String,
    pub title: String,
    pub html_body: String,
    pub generated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload ingested from the generation workflow's webhook output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    pub lead_id: String,
    pub title: String,
    pub html_body: String,
}

/// Engagement rollup for one report, reduced to per-visitor bests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEngagement {
    pub report_id: String,
    pub unique_viewers: u64,
    pub best_scroll_depth: i64,
    pub best_duration_seconds: i64,
    pub last_viewed_at: Option<DateTime<Utc>>,
}
