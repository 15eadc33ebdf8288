//! Prospect (lead) data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LeadStage {
    New,
    Contacted,
    Replied,
    Closed,
}

impl LeadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStage::New => "New",
            LeadStage::Contacted => "Contacted",
            LeadStage::Replied => "Replied",
            LeadStage::Closed => "Closed",
        }
    }
}

/// Engagement-derived lead temperature. Computed on read, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub role: Option<String>,
    pub stage: LeadStage,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub role: Option<String>,
    pub notes: Option<String>,
}

/// Lead row enriched with engagement-derived fields for the list view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadOverview {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub stage: LeadStage,
    pub temperature: Temperature,
    pub last_engaged_at: Option<DateTime<Utc>>,
    pub best_scroll_depth: Option<i64>,
    pub best_duration_seconds: Option<i64>,
}
