use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::{
    connection::Database,
    helpers::{parse_asset_kind, parse_datetime},
    models::Asset,
};

fn row_to_asset(row: &Row) -> Result<Asset> {
    let kind: String = row.get("kind")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Asset {
        id: row.get("id")?,
        account_id: row.get("account_id")?,
        name: row.get("name")?,
        kind: parse_asset_kind(&kind)?,
        url: row.get("url")?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_asset(&self, asset: &Asset) -> Result<()> {
        let record = asset.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO assets (id, account_id, name, kind, url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id,
                    record.account_id,
                    record.name,
                    record.kind.as_str(),
                    record.url,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn get_asset(&self, account_id: &str, asset_id: &str) -> Result<Asset> {
        let account_id = account_id.to_string();
        let asset_id = asset_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, name, kind, url, created_at, updated_at
                 FROM assets
                 WHERE id = ?1 AND account_id = ?2",
            )?;

            let mut rows = stmt.query(params![asset_id, account_id])?;
            match rows.next()? {
                Some(row) => row_to_asset(row),
                None => Err(anyhow::anyhow!("Asset not found")),
            }
        })
        .await
    }

    pub async fn list_assets(&self, account_id: &str) -> Result<Vec<Asset>> {
        let account_id = account_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, account_id, name, kind, url, created_at, updated_at
                 FROM assets
                 WHERE account_id = ?1
                 ORDER BY name COLLATE NOCASE ASC",
            )?;

            let mut rows = stmt.query(params![account_id])?;
            let mut assets = Vec::new();
            while let Some(row) = rows.next()? {
                assets.push(row_to_asset(row)?);
            }

            Ok(assets)
        })
        .await
    }

    pub async fn update_asset(
        &self,
        account_id: &str,
        asset_id: &str,
        name: Option<String>,
        url: Option<String>,
    ) -> Result<Asset> {
        let account_id = account_id.to_string();
        let asset_id = asset_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE assets
                 SET name = COALESCE(?1, name),
                     url = COALESCE(?2, url),
                     updated_at = ?3
                 WHERE id = ?4 AND account_id = ?5",
                params![name, url, Utc::now().to_rfc3339(), asset_id, account_id],
            )?;

            if rows_affected == 0 {
                return Err(anyhow::anyhow!("Asset not found"));
            }

            let mut stmt = conn.prepare(
                "SELECT id, account_id, name, kind, url, created_at, updated_at
                 FROM assets
                 WHERE id = ?1 AND account_id = ?2",
            )?;
            let mut rows = stmt.query(params![asset_id, account_id])?;
            match rows.next()? {
                Some(row) => row_to_asset(row),
                None => Err(anyhow::anyhow!("Asset not found")),
            }
        })
        .await
    }

    pub async fn delete_asset(&self, account_id: &str, asset_id: &str) -> Result<()> {
        let account_id = account_id.to_string();
        let asset_id = asset_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM assets WHERE id = ?1 AND account_id = ?2",
                params![asset_id, account_id],
            )?;
            Ok(())
        })
        .await
    }
}
