use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, Row, Transaction};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::schema_gen::{generate_create_table, generate_indexes, generate_upsert};
use crate::filter::within_years_back;
use crate::model::{
    Competition, CompetitionVariant, Fixture, MatchReport, MatchTarget, PlayerStatCategory, Season,
    StandingsRow,
};
use crate::parser::{ParsedRow, SqlValue};
use crate::schema::{TableSchema, ALL_TABLES, COMPETITION, FIXTURE, MATCH_REPORT, SEASON, STANDINGS};

/// The scraped-data database.
///
/// Competitions, seasons and standings are replaced wholesale per key;
/// fixtures and match reports are upserted and never pruned.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?;

        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        let store = Self { conn };
        store.create_tables(ALL_TABLES)?;
        Ok(store)
    }

    /// Create the given tables and their indexes if missing
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        for schema in schemas {
            let sql = generate_create_table(schema);
            self.conn
                .execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;

            for index_sql in generate_indexes(schema) {
                self.conn
                    .execute(&index_sql, [])
                    .with_context(|| format!("Failed to create index for: {}", schema.name))?;
            }
        }
        debug!(tables = schemas.len(), "schema ready");
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Replace every competition of one listing.
    pub fn replace_competitions(
        &mut self,
        variant: CompetitionVariant,
        competitions: &[Competition],
    ) -> Result<usize> {
        let rows = competitions
            .iter()
            .map(competition_row)
            .collect::<Result<Vec<_>>>()?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM competition WHERE variant = ?1", [variant.as_str()])
            .context("Failed to clear competitions")?;
        insert_rows(&tx, &COMPETITION, &rows)?;
        tx.commit()?;

        info!(variant = %variant, count = rows.len(), "stored competitions");
        Ok(rows.len())
    }

    /// Replace the season list of one competition.
    pub fn replace_seasons(&mut self, competition_id: i64, seasons: &[Season]) -> Result<usize> {
        let rows = seasons.iter().map(season_row).collect::<Result<Vec<_>>>()?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM season WHERE competition_id = ?1", [competition_id])
            .context("Failed to clear seasons")?;
        insert_rows(&tx, &SEASON, &rows)?;
        tx.commit()?;

        debug!(competition_id, count = rows.len(), "stored seasons");
        Ok(rows.len())
    }

    /// Replace all standings of one competition, every season at once.
    pub fn replace_standings(
        &mut self,
        competition_id: i64,
        by_season: &BTreeMap<String, Vec<StandingsRow>>,
    ) -> Result<usize> {
        let rows: Vec<ParsedRow> = by_season
            .iter()
            .flat_map(|(season, table)| {
                table
                    .iter()
                    .map(move |entry| standings_row(competition_id, season, entry))
            })
            .collect();

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM standings WHERE competition_id = ?1", [competition_id])
            .context("Failed to clear standings")?;
        insert_rows(&tx, &STANDINGS, &rows)?;
        tx.commit()?;

        debug!(competition_id, seasons = by_season.len(), rows = rows.len(), "stored standings");
        Ok(rows.len())
    }

    /// Insert or replace fixtures by their natural key. Fixtures that vanished
    /// from the source are kept.
    pub fn upsert_fixtures(
        &mut self,
        competition_id: i64,
        competition_name: &str,
        season: &str,
        fixtures: &[Fixture],
    ) -> Result<usize> {
        let rows: Vec<ParsedRow> = fixtures
            .iter()
            .map(|f| fixture_row(competition_id, competition_name, season, f))
            .collect();

        let tx = self.conn.transaction()?;
        insert_rows(&tx, &FIXTURE, &rows)?;
        tx.commit()?;

        debug!(competition_id, season, count = rows.len(), "stored fixtures");
        Ok(rows.len())
    }

    /// Insert or replace one match report, merged with its fixture.
    pub fn upsert_match_report(
        &mut self,
        target: &MatchTarget,
        report: &MatchReport,
    ) -> Result<()> {
        let row = match_report_row(target, report)?;
        let tx = self.conn.transaction()?;
        insert_rows(&tx, &MATCH_REPORT, std::slice::from_ref(&row))?;
        tx.commit()?;
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Stored competitions, optionally narrowed to one listing or one id.
    pub fn competitions(
        &self,
        variant: Option<CompetitionVariant>,
        id: Option<i64>,
    ) -> Result<Vec<Competition>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, variant, name, link, gender, country, governing_body, tier,
                    first_season, last_season, awards
             FROM competition
             WHERE (?1 IS NULL OR variant = ?1) AND (?2 IS NULL OR id = ?2)
             ORDER BY id",
        )?;
        let raw = stmt
            .query_map(params![variant.map(|v| v.as_str()), id], |row| {
                Ok((
                    Competition {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        link: row.get("link")?,
                        gender: row.get::<_, Option<String>>("gender")?.unwrap_or_default(),
                        country: row.get("country")?,
                        governing_body: row.get("governing_body")?,
                        tier: row.get("tier")?,
                        first_season: row
                            .get::<_, Option<String>>("first_season")?
                            .unwrap_or_default(),
                        last_season: row
                            .get::<_, Option<String>>("last_season")?
                            .unwrap_or_default(),
                        awards: Vec::new(),
                        variant: CompetitionVariant::Domestic,
                    },
                    row.get::<_, String>("variant")?,
                    row.get::<_, Option<String>>("awards")?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read competitions")?;

        raw.into_iter()
            .map(|(mut competition, variant, awards)| {
                competition.variant = variant.parse().map_err(|e: String| anyhow!(e))?;
                if let Some(json) = awards {
                    competition.awards =
                        serde_json::from_str(&json).context("Invalid awards json")?;
                }
                Ok(competition)
            })
            .collect()
    }

    /// Seasons of one competition, newest label first.
    pub fn seasons(&self, competition_id: i64) -> Result<Vec<Season>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM season WHERE competition_id = ?1 ORDER BY season DESC",
        )?;
        let raw = stmt
            .query_map([competition_id], |row| {
                let mut season = Season::new(
                    row.get("competition_id")?,
                    row.get("season")?,
                    row.get("season_link")?,
                );
                season.num_squads = row.get("num_squads")?;
                season.champion = row.get("champion")?;
                season.points = row.get("points")?;
                season.runner_up = row.get("runner_up")?;
                season.host_country = row.get("host_country")?;
                season.top_goals = row.get("top_goals")?;
                Ok((season, row.get::<_, Option<String>>("top_scorer")?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read seasons")?;

        raw.into_iter()
            .map(|(mut season, top_scorer)| {
                if let Some(json) = top_scorer {
                    season.top_scorer =
                        Some(serde_json::from_str(&json).context("Invalid top scorer json")?);
                }
                Ok(season)
            })
            .collect()
    }

    /// Standings of one competition season, in stored order.
    pub fn standings(&self, competition_id: i64, season: &str) -> Result<Vec<StandingsRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM standings WHERE competition_id = ?1 AND season = ?2 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map(params![competition_id, season], |row| {
                let dynamic = |name: &str| -> rusqlite::Result<SqlValue> {
                    Ok(SqlValue::from_ref(row.get_ref(name)?))
                };
                Ok(StandingsRow {
                    rank: dynamic("rank")?,
                    team: row.get("team")?,
                    team_id: row.get("team_id")?,
                    team_link: row.get::<_, Option<String>>("team_link")?.unwrap_or_default(),
                    matches_played: dynamic("matches_played")?,
                    wins: dynamic("wins")?,
                    draws: dynamic("draws")?,
                    losses: dynamic("losses")?,
                    goals_for: dynamic("goals_for")?,
                    goals_against: dynamic("goals_against")?,
                    goal_difference: dynamic("goal_difference")?,
                    points: dynamic("points")?,
                    points_per_match_played: dynamic("points_per_match_played")?,
                    expected_goals: dynamic("expected_goals")?,
                    expected_goals_allowed: dynamic("expected_goals_allowed")?,
                    expected_goals_difference: dynamic("expected_goals_difference")?,
                    expected_goals_difference_per_90_minutes: dynamic(
                        "expected_goals_difference_per_90_minutes",
                    )?,
                    avg_home_attendance: dynamic("avg_home_attendance")?,
                    top_team_scorer: row.get("top_team_scorer")?,
                    top_team_scorer_goals: row.get("top_team_scorer_goals")?,
                    goalkeeper: row.get("goalkeeper")?,
                    notes: row.get("notes")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read standings")?;
        Ok(rows)
    }

    /// Fixtures with a match report link whose season lies in the window.
    pub fn match_targets(
        &self,
        competition_id: Option<i64>,
        years_back: u32,
        current_year: i32,
    ) -> Result<Vec<MatchTarget>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM fixture
             WHERE match_report_link IS NOT NULL AND (?1 IS NULL OR competition_id = ?1)
             ORDER BY competition_id, season, date",
        )?;
        let targets = stmt
            .query_map([competition_id], |row| {
                Ok(MatchTarget {
                    competition_id: row.get("competition_id")?,
                    competition_name: row.get("competition_name")?,
                    season: row.get("season")?,
                    fixture: fixture_from_row(row)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read fixtures")?;

        Ok(targets
            .into_iter()
            .filter(|t| within_years_back(&t.season, years_back, current_year))
            .collect())
    }

    pub fn table_count(&self, table: &str) -> Result<u64> {
        if !ALL_TABLES.iter().any(|t| t.name == table) {
            return Err(anyhow!("Unknown table '{table}'"));
        }
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Insert a batch of rows, binding values in schema column order
fn insert_rows(tx: &Transaction, schema: &TableSchema, rows: &[ParsedRow]) -> Result<()> {
    let sql = generate_upsert(schema);
    let columns = schema.column_names();
    let mut stmt = tx.prepare_cached(&sql)?;

    for row in rows {
        for (idx, col_name) in columns.iter().enumerate() {
            match row.values.get(*col_name) {
                Some(value) => value.bind_to(idx + 1, &mut stmt)?,
                None => SqlValue::Null.bind_to(idx + 1, &mut stmt)?,
            }
        }
        stmt.raw_execute()
            .with_context(|| format!("Failed to insert into {}", schema.name))?;
    }

    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("Failed to serialize json column")
}

fn competition_row(c: &Competition) -> Result<ParsedRow> {
    let mut row = ParsedRow::new();
    row.set("id", c.id)
        .set("variant", c.variant.as_str())
        .set("name", c.name.as_str())
        .set("link", c.link.as_str())
        .set("gender", c.gender.as_str())
        .set("country", c.country.as_deref())
        .set("governing_body", c.governing_body.as_deref())
        .set("tier", c.tier.as_deref())
        .set("first_season", c.first_season.as_str())
        .set("last_season", c.last_season.as_str())
        .set("awards", to_json(&c.awards)?);
    Ok(row)
}

fn season_row(s: &Season) -> Result<ParsedRow> {
    let top_scorer = s.top_scorer.as_ref().map(to_json).transpose()?;
    let mut row = ParsedRow::new();
    row.set("competition_id", s.competition_id)
        .set("season", s.season.as_str())
        .set("season_link", s.season_link.as_str())
        .set("num_squads", s.num_squads)
        .set("champion", s.champion.as_deref())
        .set("points", s.points)
        .set("runner_up", s.runner_up.as_deref())
        .set("host_country", s.host_country.as_deref())
        .set("top_scorer", top_scorer)
        .set("top_goals", s.top_goals);
    Ok(row)
}

fn standings_row(competition_id: i64, season: &str, s: &StandingsRow) -> ParsedRow {
    let mut row = ParsedRow::new();
    row.set("competition_id", competition_id)
        .set("season", season)
        .set("rank", s.rank.clone())
        .set("team", s.team.as_str())
        .set("team_id", s.team_id.as_deref())
        .set("team_link", s.team_link.as_str())
        .set("matches_played", s.matches_played.clone())
        .set("wins", s.wins.clone())
        .set("draws", s.draws.clone())
        .set("losses", s.losses.clone())
        .set("goals_for", s.goals_for.clone())
        .set("goals_against", s.goals_against.clone())
        .set("goal_difference", s.goal_difference.clone())
        .set("points", s.points.clone())
        .set("points_per_match_played", s.points_per_match_played.clone())
        .set("expected_goals", s.expected_goals.clone())
        .set("expected_goals_allowed", s.expected_goals_allowed.clone())
        .set("expected_goals_difference", s.expected_goals_difference.clone())
        .set(
            "expected_goals_difference_per_90_minutes",
            s.expected_goals_difference_per_90_minutes.clone(),
        )
        .set("avg_home_attendance", s.avg_home_attendance.clone())
        .set("top_team_scorer", s.top_team_scorer.as_deref())
        .set("top_team_scorer_goals", s.top_team_scorer_goals)
        .set("goalkeeper", s.goalkeeper.as_deref())
        .set("notes", s.notes.as_deref());
    row
}

fn fixture_row(
    competition_id: i64,
    competition_name: &str,
    season: &str,
    f: &Fixture,
) -> ParsedRow {
    let mut row = ParsedRow::new();
    row.set("competition_id", competition_id)
        .set("competition_name", competition_name)
        .set("season", season)
        .set("round", f.round.as_str())
        .set("week", f.week)
        .set("day", f.day.as_str())
        .set("date", f.date.as_str())
        .set("time", f.time.as_deref())
        .set("home_team", f.home_team.as_str())
        .set("home_team_id", f.home_team_id.as_deref())
        .set("away_team", f.away_team.as_str())
        .set("away_team_id", f.away_team_id.as_deref())
        .set("home_team_xg", f.home_team_xg)
        .set("away_team_xg", f.away_team_xg)
        .set("score", f.score.as_deref())
        .set("attendance", f.attendance)
        .set("venue", f.venue.as_deref())
        .set("referee", f.referee.as_deref())
        .set("match_report_link", f.match_report_link.as_deref())
        .set("notes", f.notes.as_str());
    row
}

fn fixture_from_row(row: &Row<'_>) -> rusqlite::Result<Fixture> {
    Ok(Fixture {
        round: row.get("round")?,
        week: row.get("week")?,
        day: row.get("day")?,
        date: row.get("date")?,
        time: row.get("time")?,
        home_team: row.get("home_team")?,
        home_team_id: row.get("home_team_id")?,
        away_team: row.get("away_team")?,
        away_team_id: row.get("away_team_id")?,
        home_team_xg: row.get("home_team_xg")?,
        away_team_xg: row.get("away_team_xg")?,
        score: row.get("score")?,
        attendance: row.get("attendance")?,
        venue: row.get("venue")?,
        referee: row.get("referee")?,
        match_report_link: row.get("match_report_link")?,
        notes: row.get::<_, Option<String>>("notes")?.unwrap_or_default(),
    })
}

fn match_report_row(target: &MatchTarget, report: &MatchReport) -> Result<ParsedRow> {
    let f = &target.fixture;
    let mut row = ParsedRow::new();
    row.set("match_id", report.match_id.as_str())
        .set("match_link", report.match_link.as_str())
        .set("competition_id", target.competition_id)
        .set("competition_name", target.competition_name.as_str())
        .set("season", target.season.as_str())
        .set("round", f.round.as_str())
        .set("week", f.week)
        .set("date", f.date.as_str())
        .set("home_team", f.home_team.as_str())
        .set("home_team_id", f.home_team_id.as_deref())
        .set("away_team", f.away_team.as_str())
        .set("away_team_id", f.away_team_id.as_deref())
        .set("score", f.score.as_deref())
        .set("lineup", report.lineup.as_ref().map(to_json).transpose()?)
        .set("events", report.events.as_ref().map(to_json).transpose()?)
        .set("team_stats", report.team_stats.as_ref().map(to_json).transpose()?);

    let categories = PlayerStatCategory::OUTFIELD
        .iter()
        .chain(std::iter::once(&PlayerStatCategory::Goalkeeper));
    for category in categories {
        let json = report.player_stats.get(category).map(to_json).transpose()?;
        row.set(category.column(), json);
    }
    Ok(row)
}
