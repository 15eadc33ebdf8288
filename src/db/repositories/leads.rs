use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_lead_stage},
    models::{Lead, LeadStage},
};

fn row_to_lead(row: &Row) -> Result<Lead> {
    let stage: String = row.get("stage")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Lead {
        id: row.get("id")?,
        account_id: row.get("account_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        company: row.get("company")?,
        role: row.get("role")?,
        stage: parse_lead_stage(&stage)?,
        notes: row.get("notes")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_lead(&self, lead: &Lead) -> Result<()> {
        let record = lead.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO leads (id, account_id, name, email, company, role, stage, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    record.id,
                    record.account_id,
                    record.name,
                    record.email,
                    record.company,
                    record.role,
                    record.stage.as_str(),
                    record.notes,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_lead(&self, account_id: &str, lead_id: &str) -> Result<Lead> {
        let account_id = account_id.to_string();
        let lead_id = lead_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, name, email, company, role, stage, notes, created_at, updated_at
                 FROM leads
                 WHERE id = ?1 AND account_id = ?2",
            )?;

            let mut rows = stmt.query(params![lead_id, account_id])?;
            match rows.next()? {
                Some(row) => row_to_lead(row),
                None => Err(anyhow::anyhow!("Lead not found")),
            }
        })
        .await
    }

    pub async fn list_leads(&self, account_id: &str) -> Result<Vec<Lead>> {
        let account_id = account_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, name, email, company, role, stage, notes, created_at, updated_at
                 FROM leads
                 WHERE account_id = ?1
                 ORDER BY created_at DESC",
            )?;

            let mut rows = stmt.query(params![account_id])?;
            let mut leads = Vec::new();
            while let Some(row) = rows.next()? {
                leads.push(row_to_lead(row)?);
            }

            Ok(leads)
        })
        .await
    }

    pub async fn list_leads_paginated(
        &self,
        account_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Lead>> {
        let account_id = account_id.to_string();
        let limit = limit as i64;
        let offset = offset as i64;
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, name, email, company, role, stage, notes, created_at, updated_at
                 FROM leads
                 WHERE account_id = ?1
                 ORDER BY created_at DESC
                 LIMIT ?2 OFFSET ?3",
            )?;

            let mut rows = stmt.query(params![account_id, limit, offset])?;
            let mut leads = Vec::new();
            while let Some(row) = rows.next()? {
                leads.push(row_to_lead(row)?);
            }

            Ok(leads)
        })
        .await
    }

    pub async fn update_lead(
        &self,
        account_id: &str,
        lead_id: &str,
        name: Option<String>,
        email: Option<String>,
        company: Option<String>,
        role: Option<String>,
        notes: Option<String>,
    ) -> Result<Lead> {
        let account_id = account_id.to_string();
        let lead_id = lead_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE leads
                 SET name = COALESCE(?1, name),
                     email = COALESCE(?2, email),
                     company = COALESCE(?3, company),
                     role = COALESCE(?4, role),
                     notes = COALESCE(?5, notes),
                     updated_at = ?6
                 WHERE id = ?7 AND account_id = ?8",
                params![
                    name,
                    email,
                    company,
                    role,
                    notes,
                    Utc::now().to_rfc3339(),
                    lead_id,
                    account_id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow::anyhow!("Lead not found"));
            }

            let mut stmt = conn.prepare(
                "SELECT id, account_id, name, email, company, role, stage, notes, created_at, updated_at
                 FROM leads
                 WHERE id = ?1 AND account_id = ?2",
            )?;
            let mut rows = stmt.query(params![lead_id, account_id])?;
            match rows.next()? {
                Some(row) => row_to_lead(row),
                None => Err(anyhow::anyhow!("Lead not found")),
            }
        })
        .await
    }

    pub async fn update_lead_stage(
        &self,
        account_id: &str,
        lead_id: &str,
        stage: LeadStage,
    ) -> Result<()> {
        let account_id = account_id.to_string();
        let lead_id = lead_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE leads
                 SET stage = ?1,
                     updated_at = ?2
                 WHERE id = ?3 AND account_id = ?4",
                params![
                    stage.as_str(),
                    Utc::now().to_rfc3339(),
                    lead_id,
                    account_id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow::anyhow!("Lead not found"));
            }

            Ok(())
        })
        .await
    }

    /// Delete a lead. Emails, reports, and engagement samples hang off the
    /// lead via ON DELETE CASCADE foreign keys, so no manual cleanup here.
    pub async fn delete_lead(&self, account_id: &str, lead_id: &str) -> Result<()> {
        let account_id = account_id.to_string();
        let lead_id = lead_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM leads WHERE id = ?1 AND account_id = ?2",
                params![lead_id, account_id],
            )?;
            Ok(())
        })
        .await
    }
}
