use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::db::{Database, EngagementSample};

use super::sampler::{EngagementSampler, FlushTrigger, SampleSnapshot, ScrollGeometry};
use super::visitor::VisitorIdStore;

const DWELL_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One 60 Hz frame. Scroll events arriving inside the window coalesce into
/// the latest geometry; long report pages scroll fast enough that handling
/// every event would flood the main thread.
const SCROLL_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct SampleRecordedEvent {
    report_id: String,
    trigger: FlushTrigger,
    scroll_depth: i64,
    duration_seconds: i64,
}

struct ActiveView {
    sampler: EngagementSampler,
    visitor_id: String,
    user_agent: Option<String>,
    pending_scroll: Option<ScrollGeometry>,
    last_scroll_processed: Option<Instant>,
}

/// Async shell around the engagement sampler. Owns at most one active report
/// view; drives dwell via a 1 s ticker and persists every flushed snapshot
/// fire-and-forget. Nothing in here ever surfaces an error to the viewer.
#[derive(Clone)]
pub struct TrackingController {
    view: Arc<Mutex<Option<ActiveView>>>,
    db: Database,
    visitor: Arc<VisitorIdStore>,
    app_handle: AppHandle,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel: Arc<Mutex<Option<CancellationToken>>>,
}

impl TrackingController {
    pub fn new(app_handle: AppHandle, db: Database, visitor: Arc<VisitorIdStore>) -> Self {
        Self {
            view: Arc::new(Mutex::new(None)),
            db,
            visitor,
            app_handle,
            ticker: Arc::new(Mutex::new(None)),
            cancel: Arc::new(Mutex::new(None)),
        }
    }

    /// Begin tracking a report view. Any previous view is final-flushed and
    /// replaced; a fresh sampler instance resets all milestone latches.
    pub async fn open_report_view(
        &self,
        report_id: String,
        enabled: bool,
        user_agent: Option<String>,
    ) -> Result<()> {
        self.close_view(FlushTrigger::Teardown).await;

        if !enabled {
            info!("Engagement tracking disabled for report {report_id}");
            return Ok(());
        }

        let visitor_id = match self.visitor.get_or_create() {
            Ok(id) => id,
            Err(err) => {
                // Session identity unavailable: tracking silently stays off.
                warn!("Visitor id unavailable, engagement tracking disabled: {err:?}");
                return Ok(());
            }
        };

        {
            let mut view = self.view.lock().await;
            *view = Some(ActiveView {
                sampler: EngagementSampler::new(report_id, true, Utc::now()),
                visitor_id,
                user_agent,
                pending_scroll: None,
                last_scroll_processed: None,
            });
        }

        self.spawn_ticker().await;
        Ok(())
    }

    /// Feed a scroll event from the report view. At most one depth
    /// computation per frame interval; within the window the latest geometry
    /// is kept pending and drained on the next dwell tick.
    pub async fn record_scroll(&self, geometry: ScrollGeometry) {
        let flushed = {
            let mut guard = self.view.lock().await;
            let Some(view) = guard.as_mut() else {
                return;
            };

            let within_frame = view
                .last_scroll_processed
                .map(|at| at.elapsed() < SCROLL_FRAME_INTERVAL)
                .unwrap_or(false);
            if within_frame {
                view.pending_scroll = Some(geometry);
                return;
            }

            view.pending_scroll = None;
            view.last_scroll_processed = Some(Instant::now());
            let snapshots = view.sampler.observe_scroll(Utc::now(), geometry);
            self.collect(view, snapshots)
        };

        self.persist_samples(flushed);
    }

    /// The report view went hidden (tab switch, minimize). Best-effort
    /// flush; the view stays active in case it becomes visible again.
    pub async fn view_hidden(&self) {
        let flushed = {
            let guard = self.view.lock().await;
            let Some(view) = guard.as_ref() else {
                return;
            };

            match view.sampler.final_flush(FlushTrigger::PageHidden, Utc::now()) {
                Some(snapshot) => self.collect(view, vec![snapshot]),
                None => Vec::new(),
            }
        };

        self.persist_samples(flushed);
    }

    /// Tear down the active view (navigation away). Cleanup is synchronous;
    /// the final sample is dispatched without awaiting delivery and may be
    /// lost if the process exits first.
    pub async fn close_report_view(&self) {
        self.close_view(FlushTrigger::Teardown).await;
    }

    async fn close_view(&self, trigger: FlushTrigger) {
        if let Some(token) = self.cancel.lock().await.take() {
            token.cancel();
        }
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }

        let flushed = {
            let mut guard = self.view.lock().await;
            match guard.take() {
                Some(view) => match view.sampler.final_flush(trigger, Utc::now()) {
                    Some(snapshot) => self.collect(&view, vec![snapshot]),
                    None => Vec::new(),
                },
                None => Vec::new(),
            }
        };

        self.persist_samples(flushed);
    }

    async fn spawn_ticker(&self) {
        let cancel_token = CancellationToken::new();
        {
            let mut cancel_guard = self.cancel.lock().await;
            if let Some(previous) = cancel_guard.take() {
                previous.cancel();
            }
            *cancel_guard = Some(cancel_token.clone());
        }

        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let controller = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(DWELL_TICK_INTERVAL);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let flushed = {
                            let mut guard = controller.view.lock().await;
                            let Some(view) = guard.as_mut() else {
                                break;
                            };

                            let now = Utc::now();
                            let mut snapshots = Vec::new();
                            // Drain a scroll burst's trailing geometry before
                            // evaluating dwell, so its milestones are not lost.
                            if let Some(geometry) = view.pending_scroll.take() {
                                view.last_scroll_processed = Some(Instant::now());
                                snapshots.extend(view.sampler.observe_scroll(now, geometry));
                            }
                            snapshots.extend(view.sampler.tick(now));
                            controller.collect(view, snapshots)
                        };

                        controller.persist_samples(flushed);
                    }
                    _ = cancel_token.cancelled() => {
                        break;
                    }
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    fn collect(
        &self,
        view: &ActiveView,
        snapshots: Vec<SampleSnapshot>,
    ) -> Vec<(FlushTrigger, EngagementSample)> {
        let now = Utc::now();
        snapshots
            .into_iter()
            .map(|snapshot| {
                (
                    snapshot.trigger,
                    EngagementSample {
                        id: None,
                        report_id: view.sampler.subject_id().to_string(),
                        visitor_id: view.visitor_id.clone(),
                        user_agent: view.user_agent.clone(),
                        ip_address: None,
                        scroll_depth: snapshot.scroll_depth,
                        duration_seconds: snapshot.duration_seconds,
                        created_at: now,
                    },
                )
            })
            .collect()
    }

    /// Fire-and-forget persistence. Failures are logged and swallowed;
    /// tracking continues for subsequent milestones.
    fn persist_samples(&self, samples: Vec<(FlushTrigger, EngagementSample)>) {
        for (trigger, sample) in samples {
            let db = self.db.clone();
            let app_handle = self.app_handle.clone();
            tokio::spawn(async move {
                match db.insert_engagement_sample(&sample).await {
                    Ok(_) => {
                        let _ = app_handle.emit(
                            "engagement-sample-recorded",
                            SampleRecordedEvent {
                                report_id: sample.report_id.clone(),
                                trigger,
                                scroll_depth: sample.scroll_depth,
                                duration_seconds: sample.duration_seconds,
                            },
                        );
                    }
                    Err(err) => {
                        warn!("Failed to persist engagement sample: {err:?}");
                    }
                }
            });
        }
    }
}
