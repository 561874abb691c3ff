use anyhow::{bail, Result};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::{Pipeline, RunSummary};
use crate::documents::StandingsParser;
use crate::download::DocumentSource;
use crate::filter::is_current_season;
use crate::model::{Competition, CompetitionVariant};

impl<S: DocumentSource> Pipeline<'_, S> {
    /// Scrape the final table of every finished season for one listing.
    ///
    /// Domestic leagues back the `score-table` command, club tournaments
    /// `tournament-club` and national tournaments `tournament-nation`.
    pub fn standings(
        &mut self,
        variant: CompetitionVariant,
        competition_id: Option<i64>,
    ) -> Result<RunSummary> {
        let competitions = self.store.competitions(Some(variant), competition_id)?;
        info!(variant = %variant, competitions = competitions.len(), "scraping standings");

        let mut summary = RunSummary::default();
        for competition in &competitions {
            let result = self.competition_standings(competition);
            summary.absorb(result, &competition.name)?;
        }

        info!(variant = %variant, %summary, "standings done");
        Ok(summary)
    }

    fn competition_standings(&mut self, competition: &Competition) -> Result<usize> {
        let seasons = self.store.seasons(competition.id)?;
        if seasons.is_empty() {
            warn!(
                competition_id = competition.id,
                "no stored seasons, run the season command first"
            );
            return Ok(0);
        }

        let mut by_season = BTreeMap::new();
        for season in &seasons {
            if is_current_season(&season.season, self.today) {
                debug!(season = %season.season, "skipping current season");
                continue;
            }
            let parser = StandingsParser::new(competition.id, season.season.as_str());
            match self.scrape(&season.season_link, true, &parser)? {
                Some(rows) if !rows.is_empty() => {
                    by_season.insert(season.season.clone(), rows);
                }
                _ => debug!(season = %season.season, "no standings"),
            }
        }

        // Nothing scraped leaves the stored standings in place
        if by_season.is_empty() {
            bail!("No standings found for competition {}", competition.id);
        }
        self.store.replace_standings(competition.id, &by_season)
    }
}
