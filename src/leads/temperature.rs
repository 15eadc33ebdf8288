//! Engagement-derived lead temperature.
//!
//! Temperature is computed on read from the lead's best report engagement;
//! it is never stored, so a lead cools down on its own as time passes.

use chrono::{DateTime, Duration, Utc};

use crate::db::models::{LeadEngagement, Temperature};

/// A lead stays hot this long after a deep engagement.
const HOT_WINDOW_DAYS: i64 = 7;

/// Any engagement inside this window keeps a lead warm.
const WARM_WINDOW_DAYS: i64 = 30;

/// Deep-engagement thresholds; aligned with the sampler's 80% scroll and
/// 30 s dwell milestones.
const HOT_MIN_SCROLL_DEPTH: i64 = 80;
const HOT_MIN_DWELL_SECS: i64 = 30;

pub fn classify_temperature(
    now: DateTime<Utc>,
    engagement: Option<&LeadEngagement>,
) -> Temperature {
    let Some(engagement) = engagement else {
        return Temperature::Cold;
    };

    let age = now - engagement.last_engaged_at;
    if age > Duration::days(WARM_WINDOW_DAYS) {
        return Temperature::Cold;
    }

    let deep = engagement.best_scroll_depth >= HOT_MIN_SCROLL_DEPTH
        || engagement.best_duration_seconds >= HOT_MIN_DWELL_SECS;
    if deep && age <= Duration::days(HOT_WINDOW_DAYS) {
        Temperature::Hot
    } else {
        Temperature::Warm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engagement(days_ago: i64, scroll: i64, dwell: i64) -> LeadEngagement {
        LeadEngagement {
            best_scroll_depth: scroll,
            best_duration_seconds: dwell,
            last_engaged_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn no_engagement_is_cold() {
        assert_eq!(classify_temperature(Utc::now(), None), Temperature::Cold);
    }

    #[test]
    fn recent_deep_engagement_is_hot() {
        let now = Utc::now();
        let deep_scroll = engagement(2, 85, 5);
        assert_eq!(
            classify_temperature(now, Some(&deep_scroll)),
            Temperature::Hot
        );

        let long_dwell = engagement(6, 40, 45);
        assert_eq!(
            classify_temperature(now, Some(&long_dwell)),
            Temperature::Hot
        );
    }

    #[test]
    fn shallow_or_aging_engagement_is_warm() {
        let now = Utc::now();
        let shallow = engagement(2, 40, 10);
        assert_eq!(classify_temperature(now, Some(&shallow)), Temperature::Warm);

        // Deep but outside the hot window.
        let stale_deep = engagement(20, 95, 60);
        assert_eq!(
            classify_temperature(now, Some(&stale_deep)),
            Temperature::Warm
        );
    }

    #[test]
    fn old_engagement_goes_cold() {
        let now = Utc::now();
        let stale = engagement(45, 95, 60);
        assert_eq!(classify_temperature(now, Some(&stale)), Temperature::Cold);
    }
}
