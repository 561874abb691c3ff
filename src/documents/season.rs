use scraper::{ElementRef, Html};
use tracing::{info, warn};

use super::DocumentParser;
use crate::error::{absorb_row, FatalError, RowError, RowResult};
use crate::model::{CompetitionVariant, Season};
use crate::parser::dom::{body_rows, first_link, head_rows, header_cells, href, row_cells, text_of};
use crate::parser::headers::{season_header_map, HeaderMap};
use crate::parser::locate::seasons_table;
use crate::parser::record::{is_digits, parse_count, parse_top_scorer};

/// Rows with fewer cells are not attempted.
const MIN_CELLS: usize = 5;
/// Club tournament rows need the top scorer column at index 6.
const MIN_CLUB_TOURNAMENT_CELLS: usize = 7;

/// Parses the season history table of one competition.
pub struct SeasonListParser {
    pub variant: CompetitionVariant,
    pub competition_id: i64,
}

impl SeasonListParser {
    pub fn new(variant: CompetitionVariant, competition_id: i64) -> Self {
        Self {
            variant,
            competition_id,
        }
    }

    /// Column positions used when the header is missing or unrecognized.
    fn positional_columns(&self) -> &'static [(&'static str, usize)] {
        match self.variant {
            CompetitionVariant::Domestic => &[
                ("season", 0),
                ("num_squads", 2),
                ("champion", 3),
                ("top_scorer", 4),
            ],
            CompetitionVariant::International => &[
                ("season", 0),
                ("num_squads", 2),
                ("champion", 3),
                ("runner_up", 4),
                ("top_scorer", 6),
            ],
            CompetitionVariant::National => &[
                ("season", 0),
                ("host_country", 1),
                ("num_squads", 2),
                ("champion", 3),
                ("runner_up", 4),
                ("top_scorer", 6),
            ],
        }
    }

    fn column_map(&self, table: ElementRef<'_>) -> HeaderMap {
        let header = head_rows(table)
            .last()
            .map(|row| header_cells(*row).into_iter().map(text_of).collect::<Vec<_>>())
            .unwrap_or_default();
        let map = season_header_map(header.iter().map(String::as_str));
        if map.contains_key("season") && map.len() > 1 {
            return map;
        }
        self.positional_columns()
            .iter()
            .map(|(field, idx)| (field.to_string(), *idx))
            .collect()
    }

    fn parse_row(&self, cells: &[ElementRef<'_>], columns: &HeaderMap) -> RowResult<Season> {
        if self.variant == CompetitionVariant::International
            && cells.len() < MIN_CLUB_TOURNAMENT_CELLS
        {
            return Err(RowError::TooFewCells {
                found: cells.len(),
                needed: MIN_CLUB_TOURNAMENT_CELLS,
            });
        }

        let text = |field: &str| -> Option<String> {
            let idx = *columns.get(field)?;
            let value = text_of(*cells.get(idx)?);
            (!value.is_empty()).then_some(value)
        };

        let season_idx = columns.get("season").copied().unwrap_or(0);
        let season_cell = cells.get(season_idx).ok_or(RowError::MissingColumn("season"))?;
        let link = first_link(*season_cell).ok_or(RowError::MissingField("season link"))?;

        let mut season = Season::new(self.competition_id, text_of(link), href(link).to_string());
        season.num_squads = text("num_squads").as_deref().and_then(parse_count);
        season.runner_up = text("runner_up");
        season.host_country = text("host_country");

        match text("champion") {
            Some(champion) if self.variant == CompetitionVariant::Domestic => {
                let (name, points) = split_champion_points(&champion);
                season.champion = Some(name);
                season.points = points;
            }
            champion => season.champion = champion,
        }

        if let Some(top) = text("top_scorer").as_deref().and_then(parse_top_scorer) {
            season.top_scorer = Some(top.scorer);
            season.top_goals = top.goals;
        }

        Ok(season)
    }
}

impl DocumentParser for SeasonListParser {
    type Output = Vec<Season>;

    fn describe(&self) -> String {
        format!("seasons of competition {}", self.competition_id)
    }

    fn parse(&self, doc: &Html) -> Result<Vec<Season>, FatalError> {
        let Some(table) = seasons_table(doc) else {
            warn!(competition_id = self.competition_id, "seasons table not found");
            return Ok(Vec::new());
        };

        let columns = self.column_map(table);
        let mut seasons = Vec::new();
        for row in body_rows(table) {
            let cells = row_cells(row);
            if cells.len() < MIN_CELLS {
                continue;
            }
            if let Some(season) = absorb_row(self.parse_row(&cells, &columns), "season row")? {
                seasons.push(season);
            }
        }

        info!(
            competition_id = self.competition_id,
            count = seasons.len(),
            "parsed seasons"
        );
        Ok(seasons)
    }
}

/// "Manchester City - 91" to the club and its points. Text without a numeric
/// tail is returned whole.
fn split_champion_points(text: &str) -> (String, Option<i64>) {
    match text.rsplit_once('-') {
        Some((name, points)) if is_digits(points.trim()) && !name.trim().is_empty() => {
            (name.trim().to_string(), points.trim().parse().ok())
        }
        _ => (text.trim().to_string(), None),
    }
}
