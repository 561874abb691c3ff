use scraper::{ElementRef, Html};
use tracing::{info, warn};

use super::DocumentParser;
use crate::error::{absorb_row, FatalError, RowError, RowResult};
use crate::model::StandingsRow;
use crate::parser::dom::{body_rows, head_rows, header_cells, link_or_text, row_cells, text_of};
use crate::parser::headers::{standings_header_map, HeaderMap};
use crate::parser::locate::standings_table;
use crate::parser::record::{
    coerce_float, coerce_int, parse_rank, parse_top_scorer, squad_id, SqlValue,
};

/// Rows shorter than this are not attempted (separators, spacer rows).
const MIN_ATTEMPT_CELLS: usize = 3;
/// Rows shorter than this are rejected by the extractor.
const MIN_ROW_CELLS: usize = 10;

/// Parses the overall table of one (competition, season) page.
pub struct StandingsParser {
    pub competition_id: i64,
    pub season: String,
}

impl StandingsParser {
    pub fn new(competition_id: i64, season: impl Into<String>) -> Self {
        Self {
            competition_id,
            season: season.into(),
        }
    }
}

impl DocumentParser for StandingsParser {
    type Output = Vec<StandingsRow>;

    fn describe(&self) -> String {
        format!("standings {} {}", self.competition_id, self.season)
    }

    fn parse(&self, doc: &Html) -> Result<Vec<StandingsRow>, FatalError> {
        let Some(table) = standings_table(doc, self.competition_id) else {
            warn!(
                competition_id = self.competition_id,
                season = %self.season,
                "overall standings table not found"
            );
            return Ok(Vec::new());
        };

        let header_texts: Vec<String> = head_rows(table)
            .into_iter()
            .flat_map(header_cells)
            .map(text_of)
            .collect();
        let headers = standings_header_map(header_texts.iter().map(String::as_str));

        let mut rows = Vec::new();
        for row in body_rows(table) {
            let cells = row_cells(row);
            if cells.len() < MIN_ATTEMPT_CELLS {
                continue;
            }
            let parsed = parse_standings_row(&cells, &headers);
            if let Some(parsed) = absorb_row(parsed, "standings row")? {
                rows.push(parsed);
            }
        }

        info!(season = %self.season, teams = rows.len(), "parsed standings");
        Ok(rows)
    }
}

/// Extract one team line. Rank falls back to column 0 and team to column 1.
pub fn parse_standings_row(
    cells: &[ElementRef<'_>],
    headers: &HeaderMap,
) -> RowResult<StandingsRow> {
    if cells.len() < MIN_ROW_CELLS {
        return Err(RowError::TooFewCells {
            found: cells.len(),
            needed: MIN_ROW_CELLS,
        });
    }

    let cell_at = |idx: usize, fallback: usize| {
        if idx < cells.len() {
            cells[idx]
        } else {
            cells[fallback]
        }
    };

    let rank = parse_rank(&text_of(cell_at(headers.get("rank").copied().unwrap_or(0), 0)));

    let (team, team_link) = link_or_text(cell_at(headers.get("team").copied().unwrap_or(1), 1));
    if team.is_empty() {
        return Err(RowError::MissingField("team"));
    }
    let team_link = team_link.unwrap_or_default();
    let team_id = squad_id(&team_link);

    let read = |key: &str| -> Option<String> {
        let idx = *headers.get(key)?;
        cells.get(idx).map(|c| text_of(*c))
    };
    let int = |key: &str| read(key).map(|t| coerce_int(&t)).unwrap_or(SqlValue::Null);
    let float = |key: &'static str| -> RowResult<SqlValue> {
        match read(key) {
            Some(t) => coerce_float(key, &t),
            None => Ok(SqlValue::Null),
        }
    };

    let top = read("top_team_scorer").as_deref().and_then(parse_top_scorer);
    let top_team_scorer = top.as_ref().map(|t| t.scorer.joined());
    let top_team_scorer_goals = top.and_then(|t| t.goals);

    Ok(StandingsRow {
        rank,
        team,
        team_id,
        team_link,
        matches_played: int("matches_played"),
        wins: int("wins"),
        draws: int("draws"),
        losses: int("losses"),
        goals_for: int("goals_for"),
        goals_against: int("goals_against"),
        goal_difference: int("goal_difference"),
        points: int("points"),
        points_per_match_played: float("points_per_match_played")?,
        expected_goals: float("expected_goals")?,
        expected_goals_allowed: float("expected_goals_allowed")?,
        expected_goals_difference: float("expected_goals_difference")?,
        expected_goals_difference_per_90_minutes: float(
            "expected_goals_difference_per_90_minutes",
        )?,
        avg_home_attendance: read("attendance")
            .map(|t| coerce_int(&t.replace(',', "")))
            .unwrap_or(SqlValue::Null),
        top_team_scorer,
        top_team_scorer_goals,
        goalkeeper: read("goalkeeper"),
        notes: read("notes"),
    })
}
