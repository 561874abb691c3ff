use anyhow::{bail, Result};
use tracing::info;

use super::{Pipeline, RunSummary};
use crate::documents::SeasonListParser;
use crate::download::DocumentSource;
use crate::model::Competition;

impl<S: DocumentSource> Pipeline<'_, S> {
    /// Scrape the season history of every stored competition.
    pub fn seasons(&mut self, competition_id: Option<i64>) -> Result<RunSummary> {
        let competitions = self.store.competitions(None, competition_id)?;
        info!(competitions = competitions.len(), "scraping seasons");

        let mut summary = RunSummary::default();
        for competition in &competitions {
            let result = self.competition_seasons(competition);
            summary.absorb(result, &competition.name)?;
        }

        info!(%summary, "seasons done");
        Ok(summary)
    }

    fn competition_seasons(&mut self, competition: &Competition) -> Result<usize> {
        let parser = SeasonListParser::new(competition.variant, competition.id);
        let Some(seasons) = self.scrape(&competition.link, true, &parser)? else {
            bail!("No season page for competition {}", competition.id);
        };
        self.store.replace_seasons(competition.id, &seasons)
    }
}
