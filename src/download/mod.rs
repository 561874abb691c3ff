pub mod cache;
pub mod client;

pub use cache::*;
pub use client::*;

use anyhow::Result;
use scraper::Html;
use std::cell::RefCell;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Settings;

/// Where pipelines get their pages from.
pub trait DocumentSource {
    /// Parsed page at `url`, or `None` when it cannot be retrieved. With
    /// `use_cache` false any cached copy is ignored.
    fn get_document(&self, url: &str, use_cache: bool) -> Option<Html>;
}

/// Network fetcher backed by a per-pipeline HTML cache.
pub struct Fetcher {
    client: FbrefClient,
    cache: HtmlCache,
    delay: Duration,
}

impl Fetcher {
    pub fn new(settings: &Settings, pipeline: &str) -> Result<Self> {
        Ok(Self {
            client: FbrefClient::new(settings.timeout)?,
            cache: HtmlCache::new(Some(&settings.cache_dir), pipeline)?,
            delay: settings.delay,
        })
    }

    fn cached(&self, url: &str) -> Option<String> {
        match self.cache.get(url) {
            Ok(html) => html,
            Err(err) => {
                warn!(url, error = %err, "cache read failed");
                None
            }
        }
    }
}

impl DocumentSource for Fetcher {
    fn get_document(&self, url: &str, use_cache: bool) -> Option<Html> {
        if use_cache {
            if let Some(html) = self.cached(url) {
                info!(url, "[cache]");
                return Some(Html::parse_document(&html));
            }
        }

        let body = match self.client.fetch(url) {
            Ok(body) => body,
            Err(err) => {
                warn!(url, error = %format!("{err:#}"), "fetch failed");
                return None;
            }
        };

        if let Err(err) = self.cache.put(url, &body) {
            warn!(url, error = %err, "cache write failed");
        }

        // Stay polite between network requests
        thread::sleep(self.delay);
        Some(Html::parse_document(&body))
    }
}

/// Fixed in-memory pages, for running pipelines offline.
#[derive(Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<(String, bool)>>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Every `(url, use_cache)` requested so far, in order.
    pub fn requests(&self) -> Vec<(String, bool)> {
        self.requests.borrow().clone()
    }
}

impl DocumentSource for StaticPages {
    fn get_document(&self, url: &str, use_cache: bool) -> Option<Html> {
        self.requests.borrow_mut().push((url.to_string(), use_cache));
        self.pages.get(url).map(|html| Html::parse_document(html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pages_records_requests() {
        let pages = StaticPages::new().with_page("https://fbref.com/en/comps/", "<table id='x'></table>");
        assert!(pages.get_document("https://fbref.com/en/comps/", true).is_some());
        assert!(pages.get_document("https://fbref.com/missing", false).is_none());
        assert_eq!(
            pages.requests(),
            vec![
                ("https://fbref.com/en/comps/".to_string(), true),
                ("https://fbref.com/missing".to_string(), false),
            ]
        );
    }
}
