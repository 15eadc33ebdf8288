use anyhow::Result;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::{EngagementSample, LeadEngagement, ViewerEngagement},
};

fn row_to_sample(row: &Row) -> Result<EngagementSample> {
    let created_at: String = row.get("created_at")?;

    Ok(EngagementSample {
        id: row.get("id")?,
        report_id: row.get("report_id")?,
        visitor_id: row.get("visitor_id")?,
        user_agent: row.get("user_agent")?,
        ip_address: row.get("ip_address")?,
        scroll_depth: row.get("scroll_depth")?,
        duration_seconds: row.get("duration_seconds")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

fn row_to_viewer_engagement(row: &Row) -> Result<ViewerEngagement> {
    let last_seen_at: String = row.get("last_seen_at")?;

    Ok(ViewerEngagement {
        visitor_id: row.get("visitor_id")?,
        best_scroll_depth: row.get("best_scroll_depth")?,
        best_duration_seconds: row.get("best_duration_seconds")?,
        last_seen_at: parse_datetime(&last_seen_at, "last_seen_at")?,
    })
}

impl Database {
    /// Store one engagement snapshot. Samples are append-only facts; callers
    /// reduce per (report, visitor) by taking the maximum, never by summing.
    pub async fn insert_engagement_sample(&self, sample: &EngagementSample) -> Result<i64> {
        let record = sample.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO engagement_samples (report_id, visitor_id, user_agent, ip_address, scroll_depth, duration_seconds, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.report_id,
                    record.visitor_id,
                    record.user_agent,
                    record.ip_address,
                    record.scroll_depth,
                    record.duration_seconds,
                    record.created_at.to_rfc3339(),
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
    }

    pub async fn get_samples_for_report(
        &self,
        account_id: &str,
        report_id: &str,
    ) -> Result<Vec<EngagementSample>> {
        let account_id = account_id.to_string();
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT es.id, es.report_id, es.visitor_id, es.user_agent, es.ip_address, es.scroll_depth, es.duration_seconds, es.created_at
                 FROM engagement_samples es
                 JOIN reports r ON r.id = es.report_id
                 WHERE es.report_id = ?1 AND r.account_id = ?2
                 ORDER BY es.created_at ASC",
            )?;

            let mut rows = stmt.query(params![report_id, account_id])?;
            let mut samples = Vec::new();
            while let Some(row) = rows.next()? {
                samples.push(row_to_sample(row)?);
            }

            Ok(samples)
        })
        .await
    }

    /// Per-visitor best (max) engagement for one report.
    pub async fn get_viewer_engagement_for_report(
        &self,
        account_id: &str,
        report_id: &str,
    ) -> Result<Vec<ViewerEngagement>> {
        let account_id = account_id.to_string();
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT es.visitor_id,
                        MAX(es.scroll_depth) AS best_scroll_depth,
                        MAX(es.duration_seconds) AS best_duration_seconds,
                        MAX(es.created_at) AS last_seen_at
                 FROM engagement_samples es
                 JOIN reports r ON r.id = es.report_id
                 WHERE es.report_id = ?1 AND r.account_id = ?2
                 GROUP BY es.visitor_id
                 ORDER BY last_seen_at DESC",
            )?;

            let mut rows = stmt.query(params![report_id, account_id])?;
            let mut viewers = Vec::new();
            while let Some(row) = rows.next()? {
                viewers.push(row_to_viewer_engagement(row)?);
            }

            Ok(viewers)
        })
        .await
    }

    /// Per-(report, visitor) best engagement across every report the account
    /// owns. Feeds the dashboard KPI aggregation.
    pub async fn get_account_viewer_engagement(
        &self,
        account_id: &str,
    ) -> Result<Vec<ViewerEngagement>> {
        let account_id = account_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT es.visitor_id,
                        MAX(es.scroll_depth) AS best_scroll_depth,
                        MAX(es.duration_seconds) AS best_duration_seconds,
                        MAX(es.created_at) AS last_seen_at
                 FROM engagement_samples es
                 JOIN reports r ON r.id = es.report_id
                 WHERE r.account_id = ?1
                 GROUP BY es.report_id, es.visitor_id",
            )?;

            let mut rows = stmt.query(params![account_id])?;
            let mut viewers = Vec::new();
            while let Some(row) = rows.next()? {
                viewers.push(row_to_viewer_engagement(row)?);
            }

            Ok(viewers)
        })
        .await
    }

    /// Best engagement across all of one lead's reports, for the temperature
    /// classifier. None when nobody has viewed any of the lead's reports.
    pub async fn get_lead_engagement(
        &self,
        account_id: &str,
        lead_id: &str,
    ) -> Result<Option<LeadEngagement>> {
        let account_id = account_id.to_string();
        let lead_id = lead_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT MAX(es.scroll_depth) AS best_scroll_depth,
                        MAX(es.duration_seconds) AS best_duration_seconds,
                        MAX(es.created_at) AS last_engaged_at
                 FROM engagement_samples es
                 JOIN reports r ON r.id = es.report_id
                 WHERE r.account_id = ?1 AND r.lead_id = ?2",
            )?;

            let mut rows = stmt.query(params![account_id, lead_id])?;
            let engagement = match rows.next()? {
                Some(row) => {
                    // Aggregates over zero rows come back as NULLs.
                    let last_engaged_at: Option<String> = row.get("last_engaged_at")?;
                    match last_engaged_at {
                        Some(raw) => Some(LeadEngagement {
                            best_scroll_depth: row.get("best_scroll_depth")?,
                            best_duration_seconds: row.get("best_duration_seconds")?,
                            last_engaged_at: parse_datetime(&raw, "last_engaged_at")?,
                        }),
                        None => None,
                    }
                }
                None => None,
            };

            Ok(engagement)
        })
        .await
    }
}
