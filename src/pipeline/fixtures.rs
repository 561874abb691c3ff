use anyhow::Result;
use tracing::{debug, info};

use super::{Pipeline, RunSummary};
use crate::documents::{FixtureMode, FixtureParser};
use crate::download::DocumentSource;
use crate::filter::{fixture_link, is_current_season, within_years_back};
use crate::model::{Competition, CompetitionVariant};

#[derive(Debug, Clone)]
pub struct FixtureOptions {
    pub competition_id: Option<i64>,
    /// Seasons starting this many years before the current one are included.
    pub years_back: u32,
    /// Bypass the cache for the season in progress.
    pub refresh_current: bool,
    /// Keep games that have not been played yet.
    pub future_games: bool,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            competition_id: None,
            years_back: 1,
            refresh_current: false,
            future_games: false,
        }
    }
}

impl<S: DocumentSource> Pipeline<'_, S> {
    /// Scrape schedules of recent seasons of every stored competition.
    pub fn fixtures(&mut self, options: &FixtureOptions) -> Result<RunSummary> {
        let competitions = self.store.competitions(None, options.competition_id)?;
        info!(
            competitions = competitions.len(),
            years_back = options.years_back,
            "scraping fixtures"
        );

        let mut summary = RunSummary::default();
        for competition in &competitions {
            let result = self.competition_fixtures(competition, options);
            summary.absorb(result, &competition.name)?;
        }

        info!(%summary, "fixtures done");
        Ok(summary)
    }

    fn competition_fixtures(
        &mut self,
        competition: &Competition,
        options: &FixtureOptions,
    ) -> Result<usize> {
        let mode = match competition.variant {
            CompetitionVariant::Domestic => FixtureMode::League,
            CompetitionVariant::International | CompetitionVariant::National => {
                FixtureMode::Tournament
            }
        };
        let today = self.today.format("%Y-%m-%d").to_string();
        let current_year = self.current_year();

        let mut stored = 0;
        for season in self.store.seasons(competition.id)? {
            if !within_years_back(&season.season, options.years_back, current_year) {
                continue;
            }
            let current = is_current_season(&season.season, self.today);
            if current && competition.variant == CompetitionVariant::National {
                debug!(season = %season.season, "national tournament in progress, skipping");
                continue;
            }

            let parser = FixtureParser::new(
                mode,
                competition.id,
                competition.name.as_str(),
                season.season.as_str(),
            )
            .include_future(options.future_games)
            .today(today.as_str());
            let use_cache = !(current && options.refresh_current);
            let link = fixture_link(&season.season_link);

            if let Some(fixtures) = self.scrape(&link, use_cache, &parser)? {
                stored += self.store.upsert_fixtures(
                    competition.id,
                    &competition.name,
                    &season.season,
                    &fixtures,
                )?;
            }
        }
        Ok(stored)
    }
}
