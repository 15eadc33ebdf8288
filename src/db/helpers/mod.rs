use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::db::models::{AssetKind, EmailStatus, LeadStage};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn parse_lead_stage(value: &str) -> Result<LeadStage> {
    match value {
        "New" => Ok(LeadStage::New),
        "Contacted" => Ok(LeadStage::Contacted),
        "Replied" => Ok(LeadStage::Replied),
        "Closed" => Ok(LeadStage::Closed),
        other => Err(anyhow!("unknown lead stage {other}")),
    }
}

pub fn parse_email_status(value: &str) -> Result<EmailStatus> {
    match value {
        "Draft" => Ok(EmailStatus::Draft),
        "Approved" => Ok(EmailStatus::Approved),
        "Sending" => Ok(EmailStatus::Sending),
        "Sent" => Ok(EmailStatus::Sent),
        "Failed" => Ok(EmailStatus::Failed),
        other => Err(anyhow!("unknown email status {other}")),
    }
}

pub fn parse_asset_kind(value: &str) -> Result<AssetKind> {
    match value {
        "Image" => Ok(AssetKind::Image),
        "Document" => Ok(AssetKind::Document),
        "Video" => Ok(AssetKind::Video),
        "Link" => Ok(AssetKind::Link),
        other => Err(anyhow!("unknown asset kind {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_round_trips_through_rfc3339() {
        let now = Utc::now();
        let parsed = parse_datetime(&now.to_rfc3339(), "ts").unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn unknown_enum_strings_are_errors() {
        assert!(parse_lead_stage("Tepid").is_err());
        assert!(parse_email_status("Queued").is_err());
        assert!(parse_asset_kind("Gif").is_err());
    }
}
