use anyhow::{bail, Result};
use tracing::{info, warn};

use super::{Pipeline, RunSummary};
use crate::documents::MatchReportParser;
use crate::download::DocumentSource;
use crate::model::MatchTarget;

#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub competition_id: Option<i64>,
    pub years_back: u32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            competition_id: None,
            years_back: 10,
        }
    }
}

impl<S: DocumentSource> Pipeline<'_, S> {
    /// Scrape the report of every stored fixture that links one.
    pub fn matches(&mut self, options: &MatchOptions) -> Result<RunSummary> {
        let targets = self.store.match_targets(
            options.competition_id,
            options.years_back,
            self.current_year(),
        )?;
        info!(matches = targets.len(), years_back = options.years_back, "scraping match reports");

        let mut summary = RunSummary::default();
        for target in &targets {
            let fixture = &target.fixture;
            let step = format!("{} {} vs {}", fixture.date, fixture.home_team, fixture.away_team);
            let result = self.match_report(target);
            summary.absorb(result, &step)?;
        }

        info!(%summary, "match reports done");
        Ok(summary)
    }

    fn match_report(&mut self, target: &MatchTarget) -> Result<usize> {
        let Some(link) = target.fixture.match_report_link.as_deref() else {
            return Ok(0);
        };
        let parser = MatchReportParser::new(self.settings.absolute_url(link)?);
        let Some(report) = self.scrape(link, true, &parser)? else {
            bail!("Match report {link} is unavailable");
        };
        if report.is_empty() {
            warn!(match_id = %report.match_id, "match report has no sections");
        }
        self.store.upsert_match_report(target, &report)?;
        Ok(1)
    }
}
