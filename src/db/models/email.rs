//! Generated cold-email data models.
//!
//! Email bodies come from the external generation workflow; this app only
//! stores them and walks them through the review/send lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EmailStatus {
    Draft,
    Approved,
    Sending,
    Sent,
    Failed,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Draft => "Draft",
            EmailStatus::Approved => "Approved",
            EmailStatus::Sending => "Sending",
            EmailStatus::Sent => "Sent",
            EmailStatus::Failed => "Failed",
        }
    }

    /// Legal forward transitions. `Failed` is terminal alongside `Sent`.
    pub fn can_transition_to(&self, next: EmailStatus) -> bool {
        matches!(
            (self, next),
            (EmailStatus::Draft, EmailStatus::Approved)
                | (EmailStatus::Approved, EmailStatus::Sending)
                | (EmailStatus::Sending, EmailStatus::Sent)
                | (EmailStatus::Sending, EmailStatus::Failed)
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedEmail {
    pub id: String,
    pub account_id: String,
    pub lead_id: String,
    pub campaign: String,
    pub subject: String,
    pub body_markdown: String,
    pub status: EmailStatus,
    pub generated_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload ingested from the generation workflow's webhook output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedEmailInput {
    pub lead_id: String,
    pub campaign: String,
    pub subject: String,
    pub body_markdown: String,
}
