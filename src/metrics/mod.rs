//! Dashboard KPI aggregation. Everything here is in-memory reduction of
//! rows already fetched through the repositories.

pub mod commands;
mod types;

pub use types::{DashboardKpis, EmailCounts, EngagementSummary, TemperatureBreakdown};

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::db::models::{
    EmailStatus, GeneratedEmail, LeadEngagement, Temperature, ViewerEngagement,
};
use crate::leads::classify_temperature;

pub fn temperature_breakdown(
    now: DateTime<Utc>,
    engagements: &[Option<LeadEngagement>],
) -> TemperatureBreakdown {
    let mut breakdown = TemperatureBreakdown::default();
    for engagement in engagements {
        match classify_temperature(now, engagement.as_ref()) {
            Temperature::Hot => breakdown.hot += 1,
            Temperature::Warm => breakdown.warm += 1,
            Temperature::Cold => breakdown.cold += 1,
        }
    }
    breakdown
}

pub fn email_counts(emails: &[GeneratedEmail]) -> EmailCounts {
    let count =
        |status: EmailStatus| emails.iter().filter(|e| e.status == status).count() as u64;

    EmailCounts {
        total: emails.len() as u64,
        drafts: count(EmailStatus::Draft),
        approved: count(EmailStatus::Approved),
        sending: count(EmailStatus::Sending),
        sent: count(EmailStatus::Sent),
        failed: count(EmailStatus::Failed),
    }
}

/// Reduce per-(report, visitor) bests. Each pair contributes its maximum
/// once; samples were never summed on the way here.
pub fn summarize_engagement(pairs: &[ViewerEngagement]) -> EngagementSummary {
    if pairs.is_empty() {
        return EngagementSummary::default();
    }

    let unique_viewers = pairs
        .iter()
        .map(|pair| pair.visitor_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64;

    let total_scroll: i64 = pairs.iter().map(|pair| pair.best_scroll_depth).sum();
    let total_duration: i64 = pairs.iter().map(|pair| pair.best_duration_seconds).sum();
    let count = pairs.len() as f64;

    EngagementSummary {
        unique_viewers,
        average_best_scroll_depth: total_scroll as f64 / count,
        average_best_duration_seconds: total_duration as f64 / count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn breakdown_covers_every_lead() {
        let now = Utc::now();
        let engagements = vec![
            None,
            Some(LeadEngagement {
                best_scroll_depth: 90,
                best_duration_seconds: 40,
                last_engaged_at: now - Duration::days(1),
            }),
            Some(LeadEngagement {
                best_scroll_depth: 30,
                best_duration_seconds: 5,
                last_engaged_at: now - Duration::days(10),
            }),
        ];

        let breakdown = temperature_breakdown(now, &engagements);
        assert_eq!(breakdown.hot, 1);
        assert_eq!(breakdown.warm, 1);
        assert_eq!(breakdown.cold, 1);
        assert_eq!(
            breakdown.hot + breakdown.warm + breakdown.cold,
            engagements.len() as u64
        );
    }

    #[test]
    fn engagement_summary_averages_pair_bests_and_dedupes_viewers() {
        let now = Utc::now();
        // The same visitor viewed two different reports; they count once as
        // a viewer but both pairs feed the averages.
        let pairs = vec![
            ViewerEngagement {
                visitor_id: "v1".into(),
                best_scroll_depth: 100,
                best_duration_seconds: 60,
                last_seen_at: now,
            },
            ViewerEngagement {
                visitor_id: "v1".into(),
                best_scroll_depth: 50,
                best_duration_seconds: 30,
                last_seen_at: now,
            },
            ViewerEngagement {
                visitor_id: "v2".into(),
                best_scroll_depth: 30,
                best_duration_seconds: 0,
                last_seen_at: now,
            },
        ];

        let summary = summarize_engagement(&pairs);
        assert_eq!(summary.unique_viewers, 2);
        assert!((summary.average_best_scroll_depth - 60.0).abs() < f64::EPSILON);
        assert!((summary.average_best_duration_seconds - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_engagement_summary_is_zero() {
        let summary = summarize_engagement(&[]);
        assert_eq!(summary.unique_viewers, 0);
        assert_eq!(summary.average_best_scroll_depth, 0.0);
    }
}
