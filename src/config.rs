use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::download::default_cache_dir;

pub const DEFAULT_BASE_URL: &str = "https://fbref.com";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_DB: &str = "fbref.db";
pub const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/120.0.0.0 Safari/537.36"
);

/// Path of the competitions index, relative to the base url.
pub const COMPETITIONS_PATH: &str = "/en/comps/";

/// Runtime settings shared by every pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub db_path: PathBuf,
    pub cache_dir: PathBuf,
    /// Pause after each network fetch.
    pub delay: Duration,
    pub timeout: Duration,
}

impl Settings {
    pub fn new(
        base_url: &str,
        db_path: PathBuf,
        cache_dir: Option<PathBuf>,
        delay: Duration,
    ) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid base url '{base_url}'"))?;
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => default_cache_dir()?,
        };
        Ok(Self {
            base_url,
            db_path,
            cache_dir,
            delay,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Resolve a site-relative link such as `/en/comps/9/...` against the base url.
    pub fn absolute_url(&self, link: &str) -> Result<String> {
        let url = self
            .base_url
            .join(link)
            .with_context(|| format!("Cannot resolve link '{link}'"))?;
        Ok(url.to_string())
    }

    pub fn competitions_url(&self) -> Result<String> {
        self.absolute_url(COMPETITIONS_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base: &str) -> Settings {
        Settings::new(base, PathBuf::from(DEFAULT_DB), Some(PathBuf::from("cache")), DEFAULT_DELAY)
            .unwrap()
    }

    #[test]
    fn test_absolute_url() {
        let s = settings(DEFAULT_BASE_URL);
        assert_eq!(
            s.absolute_url("/en/comps/9/history/Premier-League-Seasons").unwrap(),
            "https://fbref.com/en/comps/9/history/Premier-League-Seasons"
        );
        assert_eq!(
            s.absolute_url("https://fbref.com/en/matches/cc5b4244/").unwrap(),
            "https://fbref.com/en/matches/cc5b4244/"
        );
        assert_eq!(s.competitions_url().unwrap(), "https://fbref.com/en/comps/");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(Settings::new("not a url", PathBuf::new(), None, DEFAULT_DELAY).is_err());
    }
}
