use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{from_str, to_string};

use crate::cache::http::Response;
use crate::db::{
    connection::Database,
    helpers::{parse_datetime, parse_response_type, to_status},
    models::CacheEntry,
};

fn row_to_entry(row: &Row) -> Result<CacheEntry> {
    let headers_json: String = row.get("headers_json")?;
    let response_type: String = row.get("response_type")?;
    let stored_at: String = row.get("stored_at")?;

    Ok(CacheEntry {
        cache_name: row.get("cache_name")?,
        url: row.get("url")?,
        response: Response {
            status: to_status(row.get("status")?)?,
            response_type: parse_response_type(&response_type)?,
            headers: from_str(&headers_json).context("failed to parse stored headers")?,
            body: row.get("body")?,
        },
        stored_at: parse_datetime(&stored_at, "stored_at")?,
    })
}

fn ensure_cache(conn: &Connection, cache_name: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO caches (name, created_at) VALUES (?1, ?2)",
        params![cache_name, Utc::now().to_rfc3339()],
    )
    .context("failed to create cache")?;
    Ok(())
}

fn upsert_entry(conn: &Connection, cache_name: &str, url: &str, response: &Response) -> Result<()> {
    let headers_json =
        to_string(&response.headers).context("failed to serialize response headers")?;
    conn.execute(
        "INSERT INTO cache_entries (cache_name, url, status, response_type, headers_json, body, stored_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(cache_name, url) DO UPDATE SET
             status = excluded.status,
             response_type = excluded.response_type,
             headers_json = excluded.headers_json,
             body = excluded.body,
             stored_at = excluded.stored_at",
        params![
            cache_name,
            url,
            i64::from(response.status),
            response.response_type.as_str(),
            headers_json,
            response.body,
            Utc::now().to_rfc3339(),
        ],
    )
    .context("failed to store cache entry")?;
    Ok(())
}

impl Database {
    /// Cache names in creation order.
    pub async fn list_caches(&self) -> Result<Vec<String>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM caches ORDER BY rowid ASC")?;
            let mut rows = stmt.query([])?;
            let mut names = Vec::new();
            while let Some(row) = rows.next()? {
                names.push(row.get(0)?);
            }
            Ok(names)
        })
        .await
    }

    pub async fn create_cache(&self, cache_name: &str) -> Result<()> {
        let cache_name = cache_name.to_string();
        self.execute(move |conn| ensure_cache(conn, &cache_name)).await
    }

    /// Returns whether the cache existed.
    pub async fn delete_cache(&self, cache_name: &str) -> Result<bool> {
        let cache_name = cache_name.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM cache_entries WHERE cache_name = ?1",
                params![cache_name],
            )?;
            let removed = tx.execute("DELETE FROM caches WHERE name = ?1", params![cache_name])?;
            tx.commit().context("failed to delete cache")?;
            Ok(removed > 0)
        })
        .await
    }

    pub async fn put_entry(&self, cache_name: &str, url: &str, response: &Response) -> Result<()> {
        let cache_name = cache_name.to_string();
        let url = url.to_string();
        let response = response.clone();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            ensure_cache(&tx, &cache_name)?;
            upsert_entry(&tx, &cache_name, &url, &response)?;
            tx.commit().context("failed to commit cache entry")?;
            Ok(())
        })
        .await
    }

    /// Store every entry or none of them.
    pub async fn put_entries(&self, cache_name: &str, entries: Vec<(String, Response)>) -> Result<()> {
        let cache_name = cache_name.to_string();
        self.execute(move |conn| {
            let tx = conn.transaction()?;
            ensure_cache(&tx, &cache_name)?;
            for (url, response) in &entries {
                upsert_entry(&tx, &cache_name, url, response)?;
            }
            tx.commit().context("failed to commit cache entries")?;
            Ok(())
        })
        .await
    }

    /// First entry for `url` across caches, oldest cache first.
    pub async fn find_entry(&self, url: &str) -> Result<Option<CacheEntry>> {
        let url = url.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT e.cache_name, e.url, e.status, e.response_type, e.headers_json, e.body, e.stored_at
                 FROM cache_entries e
                 JOIN caches c ON c.name = e.cache_name
                 WHERE e.url = ?1
                 ORDER BY c.rowid ASC
                 LIMIT 1",
            )?;
            let raw = stmt
                .query_row(params![url], |row| Ok(row_to_entry(row)))
                .optional()?;
            raw.transpose()
        })
        .await
    }

    pub async fn entries_in_cache(&self, cache_name: &str) -> Result<Vec<CacheEntry>> {
        let cache_name = cache_name.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT cache_name, url, status, response_type, headers_json, body, stored_at
                 FROM cache_entries
                 WHERE cache_name = ?1
                 ORDER BY url ASC",
            )?;
            let mut rows = stmt.query(params![cache_name])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row)?);
            }
            Ok(entries)
        })
        .await
    }
}
