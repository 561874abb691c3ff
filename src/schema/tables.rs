//! Table schema definitions for the FBref database

use super::types::*;

pub static COMPETITION: TableSchema = TableSchema {
    name: "competition",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("variant", ColumnType::Text),
        Column::required("name", ColumnType::Text),
        Column::required("link", ColumnType::Text),
        Column::new("gender", ColumnType::Text),
        Column::new("country", ColumnType::Text),
        Column::new("governing_body", ColumnType::Text),
        Column::new("tier", ColumnType::Text),
        Column::new("first_season", ColumnType::Text),
        Column::new("last_season", ColumnType::Text),
        Column::new("awards", ColumnType::Json),
    ],
    primary_key: &["id"],
    indexes: &[Index::on(&["variant"])],
};

pub static SEASON: TableSchema = TableSchema {
    name: "season",
    columns: &[
        Column::required("competition_id", ColumnType::Integer),
        Column::required("season", ColumnType::Text),
        Column::required("season_link", ColumnType::Text),
        Column::new("num_squads", ColumnType::Integer),
        Column::new("champion", ColumnType::Text),
        Column::new("points", ColumnType::Integer),
        Column::new("runner_up", ColumnType::Text),
        Column::new("host_country", ColumnType::Text),
        Column::new("top_scorer", ColumnType::Json),
        Column::new("top_goals", ColumnType::Integer),
    ],
    primary_key: &["competition_id", "season"],
    indexes: &[],
};

pub static STANDINGS: TableSchema = TableSchema {
    name: "standings",
    columns: &[
        Column::required("competition_id", ColumnType::Integer),
        Column::required("season", ColumnType::Text),
        Column::new("rank", ColumnType::Any),
        Column::required("team", ColumnType::Text),
        Column::new("team_id", ColumnType::Text),
        Column::new("team_link", ColumnType::Text),
        Column::new("matches_played", ColumnType::Any),
        Column::new("wins", ColumnType::Any),
        Column::new("draws", ColumnType::Any),
        Column::new("losses", ColumnType::Any),
        Column::new("goals_for", ColumnType::Any),
        Column::new("goals_against", ColumnType::Any),
        Column::new("goal_difference", ColumnType::Any),
        Column::new("points", ColumnType::Any),
        Column::new("points_per_match_played", ColumnType::Any),
        Column::new("expected_goals", ColumnType::Any),
        Column::new("expected_goals_allowed", ColumnType::Any),
        Column::new("expected_goals_difference", ColumnType::Any),
        Column::new("expected_goals_difference_per_90_minutes", ColumnType::Any),
        Column::new("avg_home_attendance", ColumnType::Any),
        Column::new("top_team_scorer", ColumnType::Text),
        Column::new("top_team_scorer_goals", ColumnType::Integer),
        Column::new("goalkeeper", ColumnType::Text),
        Column::new("notes", ColumnType::Text),
    ],
    primary_key: &["competition_id", "season", "team"],
    indexes: &[Index::on(&["team_id"])],
};

pub static FIXTURE: TableSchema = TableSchema {
    name: "fixture",
    columns: &[
        Column::required("competition_id", ColumnType::Integer),
        Column::required("competition_name", ColumnType::Text),
        Column::required("season", ColumnType::Text),
        Column::required("round", ColumnType::Text),
        Column::new("week", ColumnType::Integer),
        Column::required("day", ColumnType::Text),
        Column::required("date", ColumnType::Text),
        Column::new("time", ColumnType::Text),
        Column::required("home_team", ColumnType::Text),
        Column::new("home_team_id", ColumnType::Text),
        Column::required("away_team", ColumnType::Text),
        Column::new("away_team_id", ColumnType::Text),
        Column::new("home_team_xg", ColumnType::Real),
        Column::new("away_team_xg", ColumnType::Real),
        Column::new("score", ColumnType::Text),
        Column::new("attendance", ColumnType::Integer),
        Column::new("venue", ColumnType::Text),
        Column::new("referee", ColumnType::Text),
        Column::new("match_report_link", ColumnType::Text),
        Column::new("notes", ColumnType::Text),
    ],
    primary_key: &["competition_id", "season", "date", "home_team", "away_team"],
    indexes: &[Index::on(&["match_report_link"])],
};

pub static MATCH_REPORT: TableSchema = TableSchema {
    name: "match_report",
    columns: &[
        Column::required("match_id", ColumnType::Text),
        Column::required("match_link", ColumnType::Text),
        Column::required("competition_id", ColumnType::Integer),
        Column::new("competition_name", ColumnType::Text),
        Column::new("season", ColumnType::Text),
        Column::new("round", ColumnType::Text),
        Column::new("week", ColumnType::Integer),
        Column::new("date", ColumnType::Text),
        Column::new("home_team", ColumnType::Text),
        Column::new("home_team_id", ColumnType::Text),
        Column::new("away_team", ColumnType::Text),
        Column::new("away_team_id", ColumnType::Text),
        Column::new("score", ColumnType::Text),
        Column::new("lineup", ColumnType::Json),
        Column::new("events", ColumnType::Json),
        Column::new("team_stats", ColumnType::Json),
        Column::new("player_summary_stats", ColumnType::Json),
        Column::new("player_passing_stats", ColumnType::Json),
        Column::new("player_pass_types_stats", ColumnType::Json),
        Column::new("player_defense_stats", ColumnType::Json),
        Column::new("player_possession_stats", ColumnType::Json),
        Column::new("player_miscellaneous_stats", ColumnType::Json),
        Column::new("player_goalkeeper_stats", ColumnType::Json),
    ],
    primary_key: &["match_id"],
    indexes: &[Index::on(&["competition_id", "season"])],
};

/// All tables, in creation order
pub static ALL_TABLES: &[&TableSchema] = &[
    &COMPETITION,
    &SEASON,
    &STANDINGS,
    &FIXTURE,
    &MATCH_REPORT,
];
