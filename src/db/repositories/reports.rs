use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::parse_datetime,
    models::Report,
};

fn row_to_report(row: &Row) -> Result<Report> {
    let generated_at: String = row.get("generated_at")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Report {
        id: row.get("id")?,
        account_id: row.get("account_id")?,
        lead_id: row.get("lead_id")?,
        title: row.get("title")?,
        html_body: row.get("html_body")?,
        generated_at: parse_datetime(&generated_at, "generated_at")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_report(&self, report: &Report) -> Result<()> {
        let record = report.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO reports (id, account_id, lead_id, title, html_body, generated_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    record.id,
                    record.account_id,
                    record.lead_id,
                    record.title,
                    record.html_body,
                    record.generated_at.to_rfc3339(),
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_report(&self, account_id: &str, report_id: &str) -> Result<Report> {
        let account_id = account_id.to_string();
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, lead_id, title, html_body, generated_at, created_at, updated_at
                 FROM reports
                 WHERE id = ?1 AND account_id = ?2",
            )?;

            let mut rows = stmt.query(params![report_id, account_id])?;
            match rows.next()? {
                Some(row) => row_to_report(row),
                None => Err(anyhow::anyhow!("Report not found")),
            }
        })
        .await
    }

    pub async fn list_reports(&self, account_id: &str) -> Result<Vec<Report>> {
        let account_id = account_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, lead_id, title, html_body, generated_at, created_at, updated_at
                 FROM reports
                 WHERE account_id = ?1
                 ORDER BY generated_at DESC",
            )?;

            let mut rows = stmt.query(params![account_id])?;
            let mut reports = Vec::new();
            while let Some(row) = rows.next()? {
                reports.push(row_to_report(row)?);
            }

            Ok(reports)
        })
        .await
    }

    pub async fn list_reports_for_lead(
        &self,
        account_id: &str,
        lead_id: &str,
    ) -> Result<Vec<Report>> {
        let account_id = account_id.to_string();
        let lead_id = lead_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, lead_id, title, html_body, generated_at, created_at, updated_at
                 FROM reports
                 WHERE account_id = ?1 AND lead_id = ?2
                 ORDER BY generated_at DESC",
            )?;

            let mut rows = stmt.query(params![account_id, lead_id])?;
            let mut reports = Vec::new();
            while let Some(row) = rows.next()? {
                reports.push(row_to_report(row)?);
            }

            Ok(reports)
        })
        .await
    }

    pub async fn update_report(
        &self,
        account_id: &str,
        report_id: &str,
        title: Option<String>,
        html_body: Option<String>,
    ) -> Result<()> {
        let account_id = account_id.to_string();
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE reports
                 SET title = COALESCE(?1, title),
                     html_body = COALESCE(?2, html_body),
                     updated_at = ?3
                 WHERE id = ?4 AND account_id = ?5",
                params![
                    title,
                    html_body,
                    Utc::now().to_rfc3339(),
                    report_id,
                    account_id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow::anyhow!("Report not found"));
            }

            Ok(())
        })
        .await
    }

    /// Delete a report. Its engagement samples go with it via
    /// ON DELETE CASCADE.
    pub async fn delete_report(&self, account_id: &str, report_id: &str) -> Result<()> {
        let account_id = account_id.to_string();
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM reports WHERE id = ?1 AND account_id = ?2",
                params![report_id, account_id],
            )?;
            Ok(())
        })
        .await
    }
}
