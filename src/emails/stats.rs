//! Per-campaign rollups over generated emails. Plain in-memory aggregation
//! of already-fetched rows.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::models::{EmailStatus, GeneratedEmail};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub campaign: String,
    pub total: u64,
    pub drafts: u64,
    pub approved: u64,
    pub sending: u64,
    pub sent: u64,
    pub failed: u64,
    pub sent_rate: f64,
}

pub fn summarize_campaigns(emails: &[GeneratedEmail]) -> Vec<CampaignStats> {
    let mut by_campaign: BTreeMap<&str, Vec<&GeneratedEmail>> = BTreeMap::new();
    for email in emails {
        by_campaign.entry(&email.campaign).or_default().push(email);
    }

    by_campaign
        .into_iter()
        .map(|(campaign, rows)| {
            let count = |status: EmailStatus| rows.iter().filter(|e| e.status == status).count() as u64;

            let total = rows.len() as u64;
            let sent = count(EmailStatus::Sent);
            CampaignStats {
                campaign: campaign.to_string(),
                total,
                drafts: count(EmailStatus::Draft),
                approved: count(EmailStatus::Approved),
                sending: count(EmailStatus::Sending),
                sent,
                failed: count(EmailStatus::Failed),
                sent_rate: if total == 0 {
                    0.0
                } else {
                    sent as f64 / total as f64
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn email(campaign: &str, status: EmailStatus) -> GeneratedEmail {
        let now = Utc::now();
        GeneratedEmail {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: "acct-1".into(),
            lead_id: "lead-1".into(),
            campaign: campaign.into(),
            subject: "Quick question".into(),
            body_markdown: "Hi there".into(),
            status,
            generated_at: now,
            sent_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn campaign_counts_cover_every_input_row() {
        let emails = vec![
            email("spring-launch", EmailStatus::Sent),
            email("spring-launch", EmailStatus::Sent),
            email("spring-launch", EmailStatus::Draft),
            email("spring-launch", EmailStatus::Failed),
            email("win-back", EmailStatus::Approved),
        ];

        let stats = summarize_campaigns(&emails);
        assert_eq!(stats.len(), 2);

        let total: u64 = stats.iter().map(|s| s.total).sum();
        assert_eq!(total, emails.len() as u64);

        let spring = stats.iter().find(|s| s.campaign == "spring-launch").unwrap();
        assert_eq!(spring.sent, 2);
        assert_eq!(spring.drafts, 1);
        assert_eq!(spring.failed, 1);
        assert!((spring.sent_rate - 0.5).abs() < f64::EPSILON);

        let win_back = stats.iter().find(|s| s.campaign == "win-back").unwrap();
        assert_eq!(win_back.approved, 1);
        assert_eq!(win_back.sent_rate, 0.0);
    }

    #[test]
    fn no_emails_means_no_campaigns() {
        assert!(summarize_campaigns(&[]).is_empty());
    }
}
