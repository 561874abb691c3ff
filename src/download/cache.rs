use anyhow::{Context, Result};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One cache file per pipeline, so clearing one never touches the others.
pub const PIPELINES: &[&str] = &["competition", "season", "stats", "fixture", "match"];

/// Default cache location under the platform cache directory.
pub fn default_cache_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "fbref-to-sqlite")
        .context("Could not determine cache directory")?;
    Ok(proj_dirs.cache_dir().to_path_buf())
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub pipeline: String,
    pub cache_file: PathBuf,
    pub total_entries: u64,
    pub oldest_entry: Option<String>,
    pub newest_entry: Option<String>,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedUrl {
    pub url: String,
    pub cached_at: String,
}

/// Raw HTML keyed by URL, stored in `{pipeline}_cache.db`.
pub struct HtmlCache {
    conn: Connection,
    pipeline: String,
    cache_file: PathBuf,
}

impl HtmlCache {
    pub fn new(custom_dir: Option<&Path>, pipeline: &str) -> Result<Self> {
        let cache_dir = match custom_dir {
            Some(dir) => dir.to_path_buf(),
            None => default_cache_dir()?,
        };

        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;

        let cache_file = cache_dir.join(format!("{pipeline}_cache.db"));
        let conn = Connection::open(&cache_file)
            .with_context(|| format!("Failed to open cache database {:?}", cache_file))?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS html_cache (
                url TEXT PRIMARY KEY,
                html_content TEXT NOT NULL,
                cached_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                last_accessed TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .context("Failed to initialize cache table")?;
        debug!(file = ?cache_file, "opened html cache");

        Ok(Self {
            conn,
            pipeline: pipeline.to_string(),
            cache_file,
        })
    }

    /// Cached HTML for `url`; a hit refreshes its last access time.
    pub fn get(&self, url: &str) -> Result<Option<String>> {
        let html: Option<String> = self
            .conn
            .query_row(
                "SELECT html_content FROM html_cache WHERE url = ?1",
                [url],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read cache entry for {url}"))?;

        if html.is_some() {
            self.conn
                .execute(
                    "UPDATE html_cache SET last_accessed = CURRENT_TIMESTAMP WHERE url = ?1",
                    [url],
                )
                .context("Failed to touch cache entry")?;
        }
        Ok(html)
    }

    pub fn put(&self, url: &str, html: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO html_cache (url, html_content, cached_at, last_accessed)
                 VALUES (?1, ?2, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
                params![url, html],
            )
            .with_context(|| format!("Failed to cache {url}"))?;
        debug!(url, "cached html");
        Ok(())
    }

    /// Delete entries cached more than `older_than_days` ago, or everything.
    /// Returns the number of deleted entries.
    pub fn clear(&self, older_than_days: Option<u32>) -> Result<usize> {
        let deleted = match older_than_days {
            Some(days) => self.conn.execute(
                "DELETE FROM html_cache WHERE cached_at < datetime('now', ?1)",
                [format!("-{days} days")],
            ),
            None => self.conn.execute("DELETE FROM html_cache", []),
        }
        .context("Failed to clear html cache")?;

        info!(pipeline = %self.pipeline, deleted, older_than_days, "cleared html cache");
        Ok(deleted)
    }

    pub fn stats(&self) -> Result<CacheStats> {
        let (total_entries, oldest_entry, newest_entry) = self
            .conn
            .query_row(
                "SELECT COUNT(*), MIN(cached_at), MAX(cached_at) FROM html_cache",
                [],
                |row| Ok((row.get::<_, i64>(0)?, row.get(1)?, row.get(2)?)),
            )
            .context("Failed to read cache stats")?;

        let size_bytes = fs::metadata(&self.cache_file).map(|m| m.len()).unwrap_or(0);

        Ok(CacheStats {
            pipeline: self.pipeline.clone(),
            cache_file: self.cache_file.clone(),
            total_entries: total_entries as u64,
            oldest_entry,
            newest_entry,
            size_bytes,
        })
    }

    /// Cached URLs, newest first.
    pub fn list(&self) -> Result<Vec<CachedUrl>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url, cached_at FROM html_cache ORDER BY cached_at DESC, url")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CachedUrl {
                    url: row.get(0)?,
                    cached_at: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list cached urls")?;
        Ok(rows)
    }
}
