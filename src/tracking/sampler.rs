use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scroll-depth milestones, in percent of document height.
pub const SCROLL_MILESTONE_MID: i64 = 50;
pub const SCROLL_MILESTONE_DEEP: i64 = 80;

/// Dwell milestones, in seconds since the view opened.
pub const DWELL_MILESTONE_SHORT_SECS: i64 = 10;
pub const DWELL_MILESTONE_LONG_SECS: i64 = 30;

/// Scroll geometry reported by the report view.
#[derive(Debug, Clone, Copy)]
pub struct ScrollGeometry {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

/// Depth in percent, clamped to [0, 100]. The raw ratio can exceed 100 on
/// documents shorter than the viewport.
pub fn scroll_depth_percent(geometry: &ScrollGeometry) -> i64 {
    if geometry.document_height <= 0.0 {
        return 0;
    }

    let raw = 100.0 * (geometry.scroll_top + geometry.viewport_height) / geometry.document_height;
    (raw.round() as i64).clamp(0, 100)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FlushTrigger {
    ScrollMidpoint,
    ScrollDeep,
    DwellShort,
    DwellLong,
    PageHidden,
    Teardown,
}

/// Snapshot of the counters at flush time. Always the full current values,
/// never a delta.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleSnapshot {
    pub trigger: FlushTrigger,
    pub scroll_depth: i64,
    pub duration_seconds: i64,
}

/// One-shot latches. Each transitions false -> true at most once per sampler
/// instance and never resets; a new report view gets a new sampler.
#[derive(Debug, Clone, Copy, Default)]
struct MilestoneFlags {
    scroll_mid: bool,
    scroll_deep: bool,
    dwell_short: bool,
    dwell_long: bool,
}

/// Passive engagement sampler for a single report view.
///
/// Pure state machine: callers feed it scroll geometry and clock ticks, it
/// hands back the snapshots that should be persisted. Elapsed time is always
/// recomputed from the start timestamp rather than accumulated, so throttled
/// or delayed ticks cannot drift the dwell counter.
#[derive(Debug, Clone)]
pub struct EngagementSampler {
    subject_id: String,
    enabled: bool,
    started_at: DateTime<Utc>,
    scroll_depth: i64,
    milestones: MilestoneFlags,
}

impl EngagementSampler {
    pub fn new(subject_id: String, enabled: bool, started_at: DateTime<Utc>) -> Self {
        Self {
            subject_id,
            enabled,
            started_at,
            scroll_depth: 0,
            milestones: MilestoneFlags::default(),
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_seconds().max(0)
    }

    /// Feed one (coalesced) scroll event. Both scroll milestones can fire
    /// from a single call when the jump is large.
    pub fn observe_scroll(
        &mut self,
        now: DateTime<Utc>,
        geometry: ScrollGeometry,
    ) -> Vec<SampleSnapshot> {
        self.scroll_depth = scroll_depth_percent(&geometry);

        let mut flushes = Vec::new();
        if !self.milestones.scroll_mid && self.scroll_depth >= SCROLL_MILESTONE_MID {
            self.milestones.scroll_mid = true;
            self.push_snapshot(&mut flushes, FlushTrigger::ScrollMidpoint, now);
        }
        if !self.milestones.scroll_deep && self.scroll_depth >= SCROLL_MILESTONE_DEEP {
            self.milestones.scroll_deep = true;
            self.push_snapshot(&mut flushes, FlushTrigger::ScrollDeep, now);
        }

        flushes
    }

    /// Clock tick on the dwell cadence. Both dwell milestones can fire from
    /// a single call after a long stall.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<SampleSnapshot> {
        let elapsed = self.elapsed_seconds(now);

        let mut flushes = Vec::new();
        if !self.milestones.dwell_short && elapsed >= DWELL_MILESTONE_SHORT_SECS {
            self.milestones.dwell_short = true;
            self.push_snapshot(&mut flushes, FlushTrigger::DwellShort, now);
        }
        if !self.milestones.dwell_long && elapsed >= DWELL_MILESTONE_LONG_SECS {
            self.milestones.dwell_long = true;
            self.push_snapshot(&mut flushes, FlushTrigger::DwellLong, now);
        }

        flushes
    }

    /// Best-effort snapshot for page-hide and teardown. Does not latch
    /// anything; a view hidden and re-shown flushes again on the next hide.
    pub fn final_flush(&self, trigger: FlushTrigger, now: DateTime<Utc>) -> Option<SampleSnapshot> {
        if !self.enabled {
            return None;
        }

        Some(SampleSnapshot {
            trigger,
            scroll_depth: self.scroll_depth,
            duration_seconds: self.elapsed_seconds(now),
        })
    }

    fn push_snapshot(
        &self,
        flushes: &mut Vec<SampleSnapshot>,
        trigger: FlushTrigger,
        now: DateTime<Utc>,
    ) {
        if !self.enabled {
            return;
        }

        flushes.push(SampleSnapshot {
            trigger,
            scroll_depth: self.scroll_depth,
            duration_seconds: self.elapsed_seconds(now),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn geometry(scroll_top: f64) -> ScrollGeometry {
        // 1000px document, 100px viewport: scroll_top 0 => depth 10,
        // scroll_top 900 => depth 100.
        ScrollGeometry {
            scroll_top,
            viewport_height: 100.0,
            document_height: 1000.0,
        }
    }

    fn depth_geometry(depth: i64) -> ScrollGeometry {
        geometry((depth as f64) * 10.0 - 100.0)
    }

    fn sampler_at(start: DateTime<Utc>) -> EngagementSampler {
        EngagementSampler::new("report-1".to_string(), true, start)
    }

    #[test]
    fn depth_is_clamped_on_short_documents() {
        // Document shorter than the viewport: raw ratio exceeds 100.
        let short = ScrollGeometry {
            scroll_top: 0.0,
            viewport_height: 800.0,
            document_height: 500.0,
        };
        assert_eq!(scroll_depth_percent(&short), 100);

        let degenerate = ScrollGeometry {
            scroll_top: 0.0,
            viewport_height: 800.0,
            document_height: 0.0,
        };
        assert_eq!(scroll_depth_percent(&degenerate), 0);
    }

    #[test]
    fn scroll_milestones_fire_exactly_once() {
        let start = Utc::now();
        let mut sampler = sampler_at(start);
        let now = start + Duration::seconds(1);

        let mut fired = Vec::new();
        // Creep up, drop back below both thresholds, then go to the bottom.
        for depth in [10, 30, 55, 60, 40, 20, 85, 100, 90] {
            fired.extend(sampler.observe_scroll(now, depth_geometry(depth)));
        }

        let mids = fired
            .iter()
            .filter(|s| s.trigger == FlushTrigger::ScrollMidpoint)
            .count();
        let deeps = fired
            .iter()
            .filter(|s| s.trigger == FlushTrigger::ScrollDeep)
            .count();
        assert_eq!(mids, 1);
        assert_eq!(deeps, 1);
    }

    #[test]
    fn dwell_milestones_fire_once_and_report_monotonic_durations() {
        let start = Utc::now();
        let mut sampler = sampler_at(start);

        let mut fired = Vec::new();
        for secs in 1..=35 {
            fired.extend(sampler.tick(start + Duration::seconds(secs)));
        }

        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].trigger, FlushTrigger::DwellShort);
        assert!(fired[0].duration_seconds >= 10);
        assert_eq!(fired[1].trigger, FlushTrigger::DwellLong);
        assert!(fired[1].duration_seconds >= 30);
    }

    #[test]
    fn fast_scroll_through_fires_both_milestones_from_one_event() {
        let start = Utc::now();
        let mut sampler = sampler_at(start);

        let fired = sampler.observe_scroll(start + Duration::seconds(1), depth_geometry(90));
        assert_eq!(fired.len(), 2);
        assert!(fired
            .iter()
            .any(|s| s.trigger == FlushTrigger::ScrollMidpoint));
        assert!(fired.iter().any(|s| s.trigger == FlushTrigger::ScrollDeep));
        for snapshot in &fired {
            assert_eq!(snapshot.scroll_depth, 90);
        }
    }

    #[test]
    fn new_sampler_resets_milestones_for_a_new_subject() {
        let start = Utc::now();
        let mut first = sampler_at(start);
        let now = start + Duration::seconds(1);

        assert_eq!(first.observe_scroll(now, depth_geometry(90)).len(), 2);
        // Same milestones latch again on a fresh view, same visitor or not.
        let mut second = EngagementSampler::new("report-2".to_string(), true, now);
        assert_eq!(
            second
                .observe_scroll(now + Duration::seconds(1), depth_geometry(90))
                .len(),
            2
        );
    }

    #[test]
    fn hide_mid_read_flushes_current_counters_only() {
        let start = Utc::now();
        let mut sampler = sampler_at(start);

        let mut fired = Vec::new();
        fired.extend(sampler.observe_scroll(start + Duration::seconds(2), depth_geometry(40)));
        for secs in 1..=15 {
            fired.extend(sampler.tick(start + Duration::seconds(secs)));
        }

        // Only the 10s dwell milestone crossed; 50/80/30s never did.
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].trigger, FlushTrigger::DwellShort);

        let hide = sampler
            .final_flush(FlushTrigger::PageHidden, start + Duration::seconds(15))
            .unwrap();
        assert_eq!(hide.scroll_depth, 40);
        assert_eq!(hide.duration_seconds, 15);
    }

    #[test]
    fn counters_keep_advancing_when_flushes_are_dropped() {
        // The persistence sink failing (or dropping samples) must not stall
        // the sampler; later milestones still latch with correct snapshots.
        let start = Utc::now();
        let mut sampler = sampler_at(start);

        let _ = sampler.observe_scroll(start + Duration::seconds(1), depth_geometry(60));
        let _ = sampler.tick(start + Duration::seconds(12));

        let fired = sampler.observe_scroll(start + Duration::seconds(13), depth_geometry(95));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].trigger, FlushTrigger::ScrollDeep);
        assert_eq!(fired[0].scroll_depth, 95);
        assert_eq!(fired[0].duration_seconds, 13);
    }

    #[test]
    fn disabled_sampler_emits_nothing() {
        let start = Utc::now();
        let mut sampler = EngagementSampler::new("report-1".to_string(), false, start);
        let now = start + Duration::seconds(40);

        assert!(sampler.observe_scroll(now, depth_geometry(100)).is_empty());
        assert!(sampler.tick(now).is_empty());
        assert!(sampler.final_flush(FlushTrigger::Teardown, now).is_none());
    }
}
