use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::DocumentParser;
use crate::config::DEFAULT_BASE_URL;
use crate::error::{absorb_row, FatalError, RowError, RowResult};
use crate::model::Fixture;
use crate::parser::dom::{
    body_rows, data_cells, first_link, head_rows, header_cells, href, link_or_text, row_cells,
    text_of,
};
use crate::parser::headers::{fixture_header_map, HeaderMap};
use crate::parser::locate::{league_fixture_table, tournament_fixture_tables};
use crate::parser::record::{parse_loose_int, squad_id};

/// League seasons have one schedule table; tournaments may split it by stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureMode {
    League,
    Tournament,
}

pub struct FixtureParser {
    pub mode: FixtureMode,
    pub competition_id: i64,
    pub competition_name: String,
    pub season: String,
    /// Keep games dated after `today`.
    pub include_future: bool,
    /// Today's date as `YYYY-MM-DD`.
    pub today: String,
}

impl FixtureParser {
    pub fn new(
        mode: FixtureMode,
        competition_id: i64,
        competition_name: impl Into<String>,
        season: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            competition_id,
            competition_name: competition_name.into(),
            season: season.into(),
            include_future: false,
            today: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    pub fn include_future(mut self, include: bool) -> Self {
        self.include_future = include;
        self
    }

    pub fn today(mut self, today: impl Into<String>) -> Self {
        self.today = today.into();
        self
    }

    fn is_future(&self, fixture: &Fixture) -> bool {
        !self.include_future && fixture.date.as_str() > self.today.as_str()
    }

    fn parse_league(&self, doc: &Html) -> Result<Vec<Fixture>, FatalError> {
        let Some(table) = league_fixture_table(doc, &self.season, self.competition_id) else {
            warn!(
                season = %self.season,
                competition = %self.competition_name,
                "no fixtures table found"
            );
            return Ok(Vec::new());
        };
        let Some(columns) = fixture_columns(table) else {
            warn!(
                season = %self.season,
                competition = %self.competition_name,
                "fixture columns not recognized"
            );
            return Ok(Vec::new());
        };

        let mut fixtures = Vec::new();
        for row in body_rows(table) {
            let parsed = parse_fixture_row(row, &columns);
            let Some(mut fixture) = absorb_row(parsed, "fixture row")? else {
                continue;
            };
            if fixture.round.is_empty() {
                fixture.round = self.competition_name.clone();
            }
            if !self.is_future(&fixture) {
                fixtures.push(fixture);
            }
        }
        Ok(fixtures)
    }

    fn parse_tournament(&self, doc: &Html) -> Result<Vec<Fixture>, FatalError> {
        let tables = tournament_fixture_tables(doc, &self.season, self.competition_id);
        if tables.is_empty() {
            warn!(
                season = %self.season,
                competition = %self.competition_name,
                "no tournament tables found"
            );
            return Ok(Vec::new());
        }

        let mut fixtures = Vec::new();
        let mut seen = HashSet::new();

        for table in tables {
            let table_id = table.value().id().unwrap_or("no-id");
            let Some(columns) = fixture_columns(table) else {
                debug!(table_id, "skipping table without usable columns");
                continue;
            };

            let mut current_round: Option<String> = None;
            for row in body_rows(table) {
                // A header-only row announces the round of the rows below it
                if !header_cells(row).is_empty() && data_cells(row).is_empty() {
                    let text = text_of(row);
                    if !text.is_empty() {
                        current_round = Some(text);
                    }
                    continue;
                }

                let parsed = parse_fixture_row(row, &columns);
                let Some(mut fixture) = absorb_row(parsed, table_id)? else {
                    continue;
                };
                if fixture.round.is_empty() {
                    fixture.round = current_round
                        .clone()
                        .unwrap_or_else(|| self.competition_name.clone());
                }
                if self.is_future(&fixture) {
                    continue;
                }
                if seen.insert(fixture.dedup_key()) {
                    fixtures.push(fixture);
                } else {
                    debug!(
                        date = %fixture.date,
                        home = %fixture.home_team,
                        away = %fixture.away_team,
                        "duplicate fixture"
                    );
                }
            }
        }
        Ok(fixtures)
    }
}

impl DocumentParser for FixtureParser {
    type Output = Vec<Fixture>;

    fn describe(&self) -> String {
        format!("fixtures {} {}", self.competition_name, self.season)
    }

    fn parse(&self, doc: &Html) -> Result<Vec<Fixture>, FatalError> {
        let fixtures = match self.mode {
            FixtureMode::League => self.parse_league(doc)?,
            FixtureMode::Tournament => self.parse_tournament(doc)?,
        };
        info!(
            season = %self.season,
            competition = %self.competition_name,
            count = fixtures.len(),
            "parsed fixtures"
        );
        Ok(fixtures)
    }
}

/// Column map from the first header row, or `None` without the essential columns.
fn fixture_columns(table: ElementRef<'_>) -> Option<HeaderMap> {
    let header_row = *head_rows(table).first()?;
    let cells: Vec<(String, String)> = row_cells(header_row)
        .into_iter()
        .map(|cell| (text_of(cell), cell.html()))
        .collect();
    fixture_header_map(cells.iter().map(|(t, m)| (t.as_str(), m.as_str())))
}

/// Absolute match report URL.
fn absolute_link(link: &str) -> String {
    if link.starts_with('/') {
        format!("{DEFAULT_BASE_URL}{link}")
    } else {
        link.to_string()
    }
}

/// Extract one fixture. The round is left empty when the table has none.
pub fn parse_fixture_row(row: ElementRef<'_>, columns: &HeaderMap) -> RowResult<Fixture> {
    let cells = row_cells(row);
    let widest = columns.values().copied().max().unwrap_or(0);
    if cells.len() < columns.len() || widest >= cells.len() {
        return Err(RowError::TooFewCells {
            found: cells.len(),
            needed: columns.len().max(widest + 1),
        });
    }

    let cell = |field: &str| columns.get(field).map(|idx| cells[*idx]);
    let text = |field: &str| -> Option<String> {
        let value = text_of(cell(field)?);
        (!value.is_empty()).then_some(value)
    };
    let team = |field: &str| -> (String, Option<String>) {
        match cell(field) {
            Some(c) => {
                let (name, link) = link_or_text(c);
                (name, link.as_deref().and_then(squad_id))
            }
            None => (String::new(), None),
        }
    };

    let (home_team, home_team_id) = team("home_team");
    let (away_team, away_team_id) = team("away_team");
    let day = text("day").ok_or(RowError::MissingField("day"))?;
    let date = text("date").ok_or(RowError::MissingField("date"))?;
    if home_team.is_empty() {
        return Err(RowError::MissingField("home_team"));
    }
    if away_team.is_empty() {
        return Err(RowError::MissingField("away_team"));
    }

    let match_report_link = cell("match_report")
        .and_then(first_link)
        .map(|a| absolute_link(href(a)));

    Ok(Fixture {
        round: text("round").unwrap_or_default(),
        week: text("week").as_deref().and_then(parse_loose_int),
        day,
        date,
        time: text("time"),
        home_team,
        home_team_id,
        away_team,
        away_team_id,
        home_team_xg: text("home_xg").and_then(|t| t.parse().ok()),
        away_team_xg: text("away_xg").and_then(|t| t.parse().ok()),
        score: text("score"),
        attendance: text("attendance").as_deref().and_then(parse_loose_int),
        venue: text("venue"),
        referee: text("referee"),
        match_report_link,
        notes: text("notes").unwrap_or_default(),
    })
}
