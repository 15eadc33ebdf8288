use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_email_status, parse_optional_datetime},
    models::{EmailStatus, GeneratedEmail},
};

fn row_to_email(row: &Row) -> Result<GeneratedEmail> {
    let status: String = row.get("status")?;
    let generated_at: String = row.get("generated_at")?;
    let sent_at: Option<String> = row.get("sent_at")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(GeneratedEmail {
        id: row.get("id")?,
        account_id: row.get("account_id")?,
        lead_id: row.get("lead_id")?,
        campaign: row.get("campaign")?,
        subject: row.get("subject")?,
        body_markdown: row.get("body_markdown")?,
        status: parse_email_status(&status)?,
        generated_at: parse_datetime(&generated_at, "generated_at")?,
        sent_at: parse_optional_datetime(sent_at, "sent_at")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_generated_email(&self, email: &GeneratedEmail) -> Result<()> {
        let record = email.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO generated_emails (id, account_id, lead_id, campaign, subject, body_markdown, status, generated_at, sent_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    record.id,
                    record.account_id,
                    record.lead_id,
                    record.campaign,
                    record.subject,
                    record.body_markdown,
                    record.status.as_str(),
                    record.generated_at.to_rfc3339(),
                    record.sent_at.as_ref().map(|dt| dt.to_rfc3339()),
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_generated_email(
        &self,
        account_id: &str,
        email_id: &str,
    ) -> Result<GeneratedEmail> {
        let account_id = account_id.to_string();
        let email_id = email_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, lead_id, campaign, subject, body_markdown, status, generated_at, sent_at, created_at, updated_at
                 FROM generated_emails
                 WHERE id = ?1 AND account_id = ?2",
            )?;

            let mut rows = stmt.query(params![email_id, account_id])?;
            match rows.next()? {
                Some(row) => row_to_email(row),
                None => Err(anyhow::anyhow!("Email not found")),
            }
        })
        .await
    }

    pub async fn list_emails(&self, account_id: &str) -> Result<Vec<GeneratedEmail>> {
        let account_id = account_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, lead_id, campaign, subject, body_markdown, status, generated_at, sent_at, created_at, updated_at
                 FROM generated_emails
                 WHERE account_id = ?1
                 ORDER BY generated_at DESC",
            )?;

            let mut rows = stmt.query(params![account_id])?;
            let mut emails = Vec::new();
            while let Some(row) = rows.next()? {
                emails.push(row_to_email(row)?);
            }

            Ok(emails)
        })
        .await
    }

    pub async fn list_emails_for_lead(
        &self,
        account_id: &str,
        lead_id: &str,
    ) -> Result<Vec<GeneratedEmail>> {
        let account_id = account_id.to_string();
        let lead_id = lead_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, lead_id, campaign, subject, body_markdown, status, generated_at, sent_at, created_at, updated_at
                 FROM generated_emails
                 WHERE account_id = ?1 AND lead_id = ?2
                 ORDER BY generated_at DESC",
            )?;

            let mut rows = stmt.query(params![account_id, lead_id])?;
            let mut emails = Vec::new();
            while let Some(row) = rows.next()? {
                emails.push(row_to_email(row)?);
            }

            Ok(emails)
        })
        .await
    }

    /// Update the editable content of a draft. The editor autosaves, so this
    /// runs often; it intentionally touches nothing but subject/body.
    pub async fn update_email_body(
        &self,
        account_id: &str,
        email_id: &str,
        subject: Option<String>,
        body_markdown: Option<String>,
    ) -> Result<()> {
        let account_id = account_id.to_string();
        let email_id = email_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE generated_emails
                 SET subject = COALESCE(?1, subject),
                     body_markdown = COALESCE(?2, body_markdown),
                     updated_at = ?3
                 WHERE id = ?4 AND account_id = ?5",
                params![
                    subject,
                    body_markdown,
                    Utc::now().to_rfc3339(),
                    email_id,
                    account_id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow::anyhow!("Email not found"));
            }

            Ok(())
        })
        .await
    }

    pub async fn mark_email_status(
        &self,
        account_id: &str,
        email_id: &str,
        status: EmailStatus,
        sent_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let account_id = account_id.to_string();
        let email_id = email_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE generated_emails
                 SET status = ?1,
                     sent_at = ?2,
                     updated_at = ?3
                 WHERE id = ?4 AND account_id = ?5",
                params![
                    status.as_str(),
                    sent_at.map(|dt| dt.to_rfc3339()),
                    Utc::now().to_rfc3339(),
                    email_id,
                    account_id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow::anyhow!("Email not found"));
            }

            Ok(())
        })
        .await
    }

    pub async fn delete_generated_email(&self, account_id: &str, email_id: &str) -> Result<()> {
        let account_id = account_id.to_string();
        let email_id = email_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM generated_emails WHERE id = ?1 AND account_id = ?2",
                params![email_id, account_id],
            )?;
            Ok(())
        })
        .await
    }

    /// Finalize emails that were mid-send when the app last exited. Runs once
    /// at startup, across all accounts.
    pub async fn recover_stuck_sending_emails(&self, recovered_at: DateTime<Utc>) -> Result<usize> {
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE generated_emails
                 SET status = ?1,
                     updated_at = ?2
                 WHERE status = ?3",
                params![
                    EmailStatus::Failed.as_str(),
                    recovered_at.to_rfc3339(),
                    EmailStatus::Sending.as_str(),
                ],
            )?;
            Ok(rows_affected)
        })
        .await
    }
}
