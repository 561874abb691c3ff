//! Scrape runs: fetch pages, parse them and persist the results.
//!
//! Every run walks a list of competitions (or fixtures) and counts each step
//! as succeeded or failed. A step failure is logged and the run continues,
//! except for a [`FatalError`](crate::error::FatalError), which ends it.

mod competitions;
mod fixtures;
mod matches;
mod seasons;
mod standings;

pub use fixtures::FixtureOptions;
pub use matches::MatchOptions;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use tracing::{debug, error, warn};

use crate::config::Settings;
use crate::documents::DocumentParser;
use crate::download::DocumentSource;
use crate::error::is_fatal;
use crate::filter;
use crate::writer::SqliteStore;

/// Outcome counts of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub successful: usize,
    pub failed: usize,
    /// Rows written across all successful steps.
    pub records: usize,
}

impl RunSummary {
    /// Count a step. Fatal errors are returned, anything else is logged.
    pub fn absorb(&mut self, result: Result<usize>, step: &str) -> Result<()> {
        match result {
            Ok(records) => {
                self.successful += 1;
                self.records += records;
                Ok(())
            }
            Err(err) if is_fatal(&err) => {
                error!(step, error = %format!("{err:#}"), "fatal error, stopping run");
                Err(err)
            }
            Err(err) => {
                error!(step, error = %format!("{err:#}"), "step failed");
                self.failed += 1;
                Ok(())
            }
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} records",
            self.successful, self.failed, self.records
        )
    }
}

/// Shared state of a run: where pages come from and where rows go.
pub struct Pipeline<'a, S: DocumentSource> {
    source: &'a S,
    store: &'a mut SqliteStore,
    settings: &'a Settings,
    today: NaiveDate,
}

impl<'a, S: DocumentSource> Pipeline<'a, S> {
    pub fn new(source: &'a S, store: &'a mut SqliteStore, settings: &'a Settings) -> Self {
        Self {
            source,
            store,
            settings,
            today: filter::today(),
        }
    }

    /// Pin the date used for current-season and future-game checks.
    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn current_year(&self) -> i32 {
        self.today.year()
    }

    /// Fetch `link` and run `parser` over it. `None` when the page is unavailable.
    fn scrape<P: DocumentParser>(
        &self,
        link: &str,
        use_cache: bool,
        parser: &P,
    ) -> Result<Option<P::Output>> {
        let url = self.settings.absolute_url(link)?;
        let Some(doc) = self.source.get_document(&url, use_cache) else {
            warn!(url = %url, "page unavailable");
            return Ok(None);
        };
        debug!(url = %url, parser = %parser.describe(), "parsing");
        let output = parser
            .parse(&doc)
            .with_context(|| format!("Failed to parse {}", parser.describe()))?;
        Ok(Some(output))
    }
}
