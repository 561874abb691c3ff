//! End-to-end pipeline runs against fixed in-memory pages.
//!
//! Each test wires a `StaticPages` source to a fresh SQLite file and drives
//! the pipelines in the order the CLI would: competition, season, standings,
//! fixture, match.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

use fbref_to_sqlite::config::{Settings, DEFAULT_BASE_URL};
use fbref_to_sqlite::download::StaticPages;
use fbref_to_sqlite::error::is_fatal;
use fbref_to_sqlite::model::CompetitionVariant;
use fbref_to_sqlite::parser::SqlValue;
use fbref_to_sqlite::pipeline::{FixtureOptions, MatchOptions, Pipeline, RunSummary};
use fbref_to_sqlite::writer::SqliteStore;

// =============================================================================
// Pages
// =============================================================================

const COMPETITIONS_URL: &str = "https://fbref.com/en/comps/";
const PL_HISTORY_URL: &str = "https://fbref.com/en/comps/9/history/Premier-League-Seasons";
const PL_2024_URL: &str = "https://fbref.com/en/comps/9/2024-2025/2024-2025-Premier-League-Stats";
const PL_2025_URL: &str = "https://fbref.com/en/comps/9/2025-2026/2025-2026-Premier-League-Stats";
const PL_2025_SCHEDULE_URL: &str =
    "https://fbref.com/en/comps/9/2025-2026/schedule/2025-2026-Premier-League-Scores-and-Fixtures";
const MATCH_URL: &str = "https://fbref.com/en/matches/aa11bb22/Manchester-United-Arsenal";

const COMPETITIONS: &str = r#"
<table id="comps_1_fa_club_league_senior">
  <tbody>
    <tr>
      <th><a href="/en/comps/9/history/Premier-League-Seasons">Premier League</a></th>
      <td>M</td>
      <td><a href="/en/country/ENG/England-Football">ENG</a></td>
      <td>1888-1889</td><td>2025-2026</td><td></td>
    </tr>
  </tbody>
</table>
<table id="comps_intl_fa_nonqualifier_senior">
  <tbody>
    <tr>
      <th><a href="/en/comps/1/history/World-Cup-Seasons">FIFA World Cup</a></th>
      <td>M</td><td>FIFA</td><td>1930</td><td>2026</td><td>1st</td><td></td>
    </tr>
  </tbody>
</table>"#;

const PL_SEASONS: &str = r#"
<table id="seasons">
  <thead><tr><th>Season</th><th>Competition Name</th><th># Squads</th><th>Champion</th><th>Top Scorer</th></tr></thead>
  <tbody>
    <tr><th><a href="/en/comps/9/2025-2026/2025-2026-Premier-League-Stats">2025-2026</a></th>
        <td>Premier League</td><td>20</td><td></td><td></td></tr>
    <tr><th><a href="/en/comps/9/2024-2025/2024-2025-Premier-League-Stats">2024-2025</a></th>
        <td>Premier League</td><td>20</td>
        <td><a href="/en/squads/822bd0ba/">Liverpool</a> - 84</td>
        <td><a href="/en/players/e342ad68/">Mohamed Salah</a> - 29</td></tr>
  </tbody>
</table>"#;

const PL_2024_STANDINGS: &str = r#"
<table id="results2024-202591_overall">
  <thead><tr>
    <th>Rk</th><th>Squad</th><th>MP</th><th>W</th><th>D</th><th>L</th><th>GF</th><th>GA</th>
    <th>GD</th><th>Pts</th><th>Top Team Scorer</th><th>Goalkeeper</th>
  </tr></thead>
  <tbody>
    <tr><th>1</th><td><a href="/en/squads/822bd0ba/2024-2025/Liverpool-Stats">Liverpool</a></td>
        <td>38</td><td>25</td><td>9</td><td>4</td><td>86</td><td>41</td><td>+45</td><td>84</td>
        <td>Mohamed Salah - 29</td><td>Alisson</td></tr>
    <tr><th>2</th><td><a href="/en/squads/18bb7c10/2024-2025/Arsenal-Stats">Arsenal</a></td>
        <td>38</td><td>20</td><td>14</td><td>4</td><td>69</td><td>34</td><td>+35</td><td>74</td>
        <td>Kai Havertz - 9</td><td>David Raya</td></tr>
  </tbody>
</table>"#;

const PL_2025_SCHEDULE: &str = r#"
<table id="sched_2025-2026_9_1">
  <thead><tr>
    <th>Wk</th><th>Day</th><th>Date</th><th>Time</th><th>Home</th><th>Score</th><th>Away</th>
    <th>Attendance</th><th>Venue</th><th>Referee</th><th>Match Report</th><th>Notes</th>
  </tr></thead>
  <tbody>
    <tr><th>1</th><td>Sun</td><td>2025-08-17</td><td>16:30</td>
        <td><a href="/en/squads/19538871/Manchester-United-Stats">Manchester Utd</a></td><td>0–1</td>
        <td><a href="/en/squads/18bb7c10/Arsenal-Stats">Arsenal</a></td>
        <td>73,548</td><td>Old Trafford</td><td>Chris Kavanagh</td>
        <td><a href="/en/matches/aa11bb22/Manchester-United-Arsenal">Match Report</a></td><td></td></tr>
    <tr><th>38</th><td>Sun</td><td>2026-05-24</td><td>16:00</td>
        <td><a href="/en/squads/18bb7c10/Arsenal-Stats">Arsenal</a></td><td></td>
        <td><a href="/en/squads/d07537b9/Brighton-Stats">Brighton</a></td>
        <td></td><td>Emirates Stadium</td><td></td><td></td><td></td></tr>
  </tbody>
</table>"#;

fn match_page(nationality: &str) -> String {
    format!(
        r##"<div class="lineup" id="a"><table>
              <tr><th colspan="2">Manchester Utd (3-4-2-1)</th></tr>
              <tr><td>24</td><td><a href="/en/players/a1b2c3d4/Andre-Onana">André Onana</a></td></tr>
            </table></div>
            <div class="lineup" id="b"><table>
              <tr><td>22</td><td><a href="/en/players/98ea5115/David-Raya">David Raya</a></td></tr>
            </table></div>
            <div class="filter switcher" data-controls="#switcher_player_stats_19538871"></div>
            <div id="switcher_player_stats_19538871">
              <div id="div_stats_19538871_summary">
                <table class="stats_table">
                  <thead><tr><th data-stat="player">Player</th><th data-stat="nationality">Nation</th>
                    <th data-stat="minutes">Min</th></tr></thead>
                  <tbody>
                    <tr><th data-stat="player"><a href="/en/players/a1b2c3d4/Andre-Onana">André Onana</a></th>
                        <td data-stat="nationality"><a href="/en/country/CMR/"><span><span class="f-i">cm</span> {nationality}</span></a></td>
                        <td>90</td></tr>
                  </tbody>
                </table>
              </div>
            </div>"##
    )
}

static TODAY: Lazy<NaiveDate> = Lazy::new(|| NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());

fn site(nationality: &str) -> StaticPages {
    StaticPages::new()
        .with_page(COMPETITIONS_URL, COMPETITIONS)
        .with_page(PL_HISTORY_URL, PL_SEASONS)
        .with_page(PL_2024_URL, PL_2024_STANDINGS)
        .with_page(PL_2025_SCHEDULE_URL, PL_2025_SCHEDULE)
        .with_page(MATCH_URL, match_page(nationality))
}

// =============================================================================
// Harness
// =============================================================================

struct TestRun {
    _dir: TempDir,
    db_path: PathBuf,
    settings: Settings,
    store: SqliteStore,
    pages: StaticPages,
}

impl TestRun {
    fn new(pages: StaticPages) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("fbref.db");
        let settings = Settings::new(
            DEFAULT_BASE_URL,
            db_path.clone(),
            Some(dir.path().join("cache")),
            Duration::ZERO,
        )
        .unwrap();
        let store = SqliteStore::open(&db_path).unwrap();
        Self {
            _dir: dir,
            db_path,
            settings,
            store,
            pages,
        }
    }

    fn pipeline(&mut self) -> Pipeline<'_, StaticPages> {
        Pipeline::new(&self.pages, &mut self.store, &self.settings).today(*TODAY)
    }

    /// Competitions and seasons, the prerequisites of every other run.
    fn seed(&mut self) {
        self.pipeline().competitions().unwrap();
        self.pipeline().seasons(None).unwrap();
    }

    fn fixtures(&mut self) -> RunSummary {
        let options = FixtureOptions {
            refresh_current: true,
            ..FixtureOptions::default()
        };
        self.pipeline().fixtures(&options).unwrap()
    }

    fn connection(&self) -> Connection {
        Connection::open(&self.db_path).unwrap()
    }
}

// =============================================================================
// Competitions and seasons
// =============================================================================

#[test]
fn test_competitions_per_variant() {
    let mut run = TestRun::new(site("CMR"));
    let summary = run.pipeline().competitions().unwrap();

    // The club tournament listing is missing from the page
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.records, 2);

    let domestic = run
        .store
        .competitions(Some(CompetitionVariant::Domestic), None)
        .unwrap();
    assert_eq!(domestic.len(), 1);
    assert_eq!(domestic[0].id, 9);
    assert_eq!(domestic[0].country.as_deref(), Some("England"));

    let national = run
        .store
        .competitions(Some(CompetitionVariant::National), None)
        .unwrap();
    assert_eq!(national[0].governing_body.as_deref(), Some("FIFA"));
}

#[test]
fn test_seasons_count_missing_pages_as_failed() {
    let mut run = TestRun::new(site("CMR"));
    run.pipeline().competitions().unwrap();
    let summary = run.pipeline().seasons(None).unwrap();

    // World Cup history page is not served
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 1);

    let seasons = run.store.seasons(9).unwrap();
    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[0].season, "2025-2026");
    assert_eq!(seasons[1].champion.as_deref(), Some("Liverpool"));
    assert_eq!(seasons[1].points, Some(84));
    assert_eq!(seasons[1].top_goals, Some(29));
}

// =============================================================================
// Standings
// =============================================================================

#[test]
fn test_score_table_skips_current_season() {
    let mut run = TestRun::new(site("CMR"));
    run.seed();

    let summary = run
        .pipeline()
        .standings(CompetitionVariant::Domestic, None)
        .unwrap();
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.records, 2);

    let requested: Vec<String> = run.pages.requests().into_iter().map(|(url, _)| url).collect();
    assert!(requested.contains(&PL_2024_URL.to_string()));
    assert!(!requested.contains(&PL_2025_URL.to_string()));

    let table = run.store.standings(9, "2024-2025").unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0].team, "Liverpool");
    assert_eq!(table[0].rank, SqlValue::Integer(1));
    assert_eq!(table[0].goal_difference, SqlValue::Text("+45".into()));
    assert_eq!(table[0].top_team_scorer_goals, Some(29));

    // A second run replaces rather than duplicates
    run.pipeline()
        .standings(CompetitionVariant::Domestic, None)
        .unwrap();
    assert_eq!(run.store.table_count("standings").unwrap(), 2);
}

#[test]
fn test_score_table_outage_keeps_stored_rows() {
    let mut run = TestRun::new(site("CMR"));
    run.seed();
    run.pipeline()
        .standings(CompetitionVariant::Domestic, None)
        .unwrap();
    assert_eq!(run.store.table_count("standings").unwrap(), 2);

    // Every season page now fails to load
    run.pages = StaticPages::new();
    let summary = run
        .pipeline()
        .standings(CompetitionVariant::Domestic, None)
        .unwrap();
    assert_eq!(summary.successful, 0);
    assert_eq!(summary.failed, 1);
    assert_eq!(run.store.table_count("standings").unwrap(), 2);
    assert_eq!(run.store.standings(9, "2024-2025").unwrap()[0].team, "Liverpool");
}

#[test]
fn test_signed_goal_difference_stays_text_in_sqlite() {
    let mut run = TestRun::new(site("CMR"));
    run.seed();
    run.pipeline()
        .standings(CompetitionVariant::Domestic, Some(9))
        .unwrap();

    let kind: String = run
        .connection()
        .query_row(
            "SELECT typeof(goal_difference) FROM standings WHERE team = 'Arsenal'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(kind, "text");
}

// =============================================================================
// Fixtures
// =============================================================================

#[test]
fn test_fixtures_refresh_current_season() {
    let mut run = TestRun::new(site("CMR"));
    run.seed();
    let summary = run.fixtures();

    assert_eq!(summary.records, 1);
    assert!(run
        .pages
        .requests()
        .contains(&(PL_2025_SCHEDULE_URL.to_string(), false)));

    let targets = run.store.match_targets(Some(9), 10, 2026).unwrap();
    assert_eq!(targets.len(), 1);
    let fixture = &targets[0].fixture;
    assert_eq!(fixture.round, "Premier League");
    assert_eq!(fixture.home_team_id.as_deref(), Some("19538871"));
    assert_eq!(fixture.attendance, Some(73548));
    assert_eq!(fixture.match_report_link.as_deref(), Some(MATCH_URL));
}

#[test]
fn test_fixtures_future_games() {
    let mut run = TestRun::new(site("CMR"));
    run.seed();
    let options = FixtureOptions {
        future_games: true,
        ..FixtureOptions::default()
    };
    let summary = run.pipeline().fixtures(&options).unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(run.store.table_count("fixture").unwrap(), 2);
}

// =============================================================================
// Match reports
// =============================================================================

#[test]
fn test_match_report_merges_fixture() {
    let mut run = TestRun::new(site("CMR"));
    run.seed();
    run.fixtures();

    let summary = run.pipeline().matches(&MatchOptions::default()).unwrap();
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 0);

    let (season, home, lineup, stats): (String, String, String, String) = run
        .connection()
        .query_row(
            "SELECT season, home_team, lineup, player_summary_stats
             FROM match_report WHERE match_id = 'aa11bb22'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .unwrap();
    assert_eq!(season, "2025-2026");
    assert_eq!(home, "Manchester Utd");

    let lineup: Value = serde_json::from_str(&lineup).unwrap();
    assert_eq!(lineup["start"]["home_team"][0]["name"], "André Onana");
    assert_eq!(lineup["start"]["away_team"][0]["player_id"], "98ea5115");

    let stats: Value = serde_json::from_str(&stats).unwrap();
    assert_eq!(stats["home_team"][0]["nationality"], "Cameroon");
    assert_eq!(stats["home_team"][0]["minutes"], 90);
}

#[test]
fn test_unmapped_nationality_stops_the_run() {
    let mut run = TestRun::new(site("ZZZ"));
    run.seed();
    run.fixtures();

    let err = run
        .pipeline()
        .matches(&MatchOptions::default())
        .unwrap_err();
    assert!(is_fatal(&err));
    assert_eq!(run.store.table_count("match_report").unwrap(), 0);
}

#[test]
fn test_match_window_excludes_old_seasons() {
    let mut run = TestRun::new(site("CMR"));
    run.seed();
    run.fixtures();

    let options = MatchOptions {
        competition_id: Some(1),
        ..MatchOptions::default()
    };
    let summary = run.pipeline().matches(&options).unwrap();
    assert_eq!(summary, RunSummary::default());
}
