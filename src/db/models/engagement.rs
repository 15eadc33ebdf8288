//! Engagement sample data models.
//!
//! Each sample is a full snapshot of one visitor's scroll depth and dwell
//! time on one report, not a delta. Consumers reduce per (report, visitor)
//! by taking the maximum, never by summing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSample {
    /// None until the row has been inserted (AUTOINCREMENT id).
    pub id: Option<i64>,
    pub report_id: String,
    pub visitor_id: String,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    /// 0..=100
    pub scroll_depth: i64,
    /// >= 0
    pub duration_seconds: i64,
    pub created_at: DateTime<Utc>,
}

/// One visitor's best engagement with a report across all their samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerEngagement {
    pub visitor_id: String,
    pub best_scroll_depth: i64,
    pub best_duration_seconds: i64,
    pub last_seen_at: DateTime<Utc>,
}

/// Best engagement across all of a lead's reports and visitors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadEngagement {
    pub best_scroll_depth: i64,
    pub best_duration_seconds: i64,
    pub last_engaged_at: DateTime<Utc>,
}
