//! Report-level engagement rollup over per-visitor bests.

use crate::db::models::{ReportEngagement, ViewerEngagement};

pub fn rollup_report_engagement(
    report_id: String,
    viewers: &[ViewerEngagement],
) -> ReportEngagement {
    ReportEngagement {
        report_id,
        unique_viewers: viewers.len() as u64,
        best_scroll_depth: viewers
            .iter()
            .map(|v| v.best_scroll_depth)
            .max()
            .unwrap_or(0),
        best_duration_seconds: viewers
            .iter()
            .map(|v| v.best_duration_seconds)
            .max()
            .unwrap_or(0),
        last_viewed_at: viewers.iter().map(|v| v.last_seen_at).max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn rollup_takes_maxima_across_viewers() {
        let now = Utc::now();
        let viewers = vec![
            ViewerEngagement {
                visitor_id: "v1".into(),
                best_scroll_depth: 100,
                best_duration_seconds: 12,
                last_seen_at: now - Duration::days(3),
            },
            ViewerEngagement {
                visitor_id: "v2".into(),
                best_scroll_depth: 55,
                best_duration_seconds: 90,
                last_seen_at: now,
            },
        ];

        let rollup = rollup_report_engagement("report-1".into(), &viewers);
        assert_eq!(rollup.unique_viewers, 2);
        assert_eq!(rollup.best_scroll_depth, 100);
        assert_eq!(rollup.best_duration_seconds, 90);
        assert_eq!(rollup.last_viewed_at, Some(now));
    }

    #[test]
    fn unviewed_report_rolls_up_to_zeroes() {
        let rollup = rollup_report_engagement("report-1".into(), &[]);
        assert_eq!(rollup.unique_viewers, 0);
        assert_eq!(rollup.best_scroll_depth, 0);
        assert_eq!(rollup.best_duration_seconds, 0);
        assert!(rollup.last_viewed_at.is_none());
    }
}
