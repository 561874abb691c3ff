//! Records produced by the document parsers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::parser::{Scorers, SqlValue};

// =============================================================================
// Competitions
// =============================================================================

/// The three competition listings on the competitions index page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionVariant {
    Domestic,
    International,
    National,
}

impl CompetitionVariant {
    pub const ALL: [CompetitionVariant; 3] = [
        CompetitionVariant::Domestic,
        CompetitionVariant::International,
        CompetitionVariant::National,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionVariant::Domestic => "domestic",
            CompetitionVariant::International => "international",
            CompetitionVariant::National => "national",
        }
    }

    /// Id of the listing table on the competitions index.
    pub fn listing_table_id(&self) -> &'static str {
        match self {
            CompetitionVariant::Domestic => "comps_1_fa_club_league_senior",
            CompetitionVariant::International => "comps_intl_club_cup",
            CompetitionVariant::National => "comps_intl_fa_nonqualifier_senior",
        }
    }
}

impl fmt::Display for CompetitionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompetitionVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "domestic" => Ok(CompetitionVariant::Domestic),
            "international" => Ok(CompetitionVariant::International),
            "national" => Ok(CompetitionVariant::National),
            other => Err(format!("unknown competition variant '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub award_name: String,
    pub award_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competition {
    pub id: i64,
    pub name: String,
    pub link: String,
    pub gender: String,
    /// Domestic leagues only.
    pub country: Option<String>,
    /// International and national competitions only.
    pub governing_body: Option<String>,
    pub tier: Option<String>,
    pub first_season: String,
    pub last_season: String,
    pub awards: Vec<Award>,
    pub variant: CompetitionVariant,
}

// =============================================================================
// Seasons
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Season {
    pub competition_id: i64,
    pub season: String,
    pub season_link: String,
    pub num_squads: Option<i64>,
    pub champion: Option<String>,
    /// Champion's points, domestic leagues only.
    pub points: Option<i64>,
    pub runner_up: Option<String>,
    /// National tournaments only.
    pub host_country: Option<String>,
    pub top_scorer: Option<Scorers>,
    pub top_goals: Option<i64>,
}

impl Season {
    pub fn new(competition_id: i64, season: String, season_link: String) -> Self {
        Self {
            competition_id,
            season,
            season_link,
            num_squads: None,
            champion: None,
            points: None,
            runner_up: None,
            host_country: None,
            top_scorer: None,
            top_goals: None,
        }
    }
}

// =============================================================================
// Standings
// =============================================================================

/// One team line of a season's overall table. Numeric columns stay dynamic:
/// signed values are kept as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsRow {
    pub rank: SqlValue,
    pub team: String,
    pub team_id: Option<String>,
    pub team_link: String,
    pub matches_played: SqlValue,
    pub wins: SqlValue,
    pub draws: SqlValue,
    pub losses: SqlValue,
    pub goals_for: SqlValue,
    pub goals_against: SqlValue,
    pub goal_difference: SqlValue,
    pub points: SqlValue,
    pub points_per_match_played: SqlValue,
    pub expected_goals: SqlValue,
    pub expected_goals_allowed: SqlValue,
    pub expected_goals_difference: SqlValue,
    pub expected_goals_difference_per_90_minutes: SqlValue,
    pub avg_home_attendance: SqlValue,
    pub top_team_scorer: Option<String>,
    pub top_team_scorer_goals: Option<i64>,
    pub goalkeeper: Option<String>,
    pub notes: Option<String>,
}

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fixture {
    pub round: String,
    pub week: Option<i64>,
    pub day: String,
    pub date: String,
    pub time: Option<String>,
    pub home_team: String,
    pub home_team_id: Option<String>,
    pub away_team: String,
    pub away_team_id: Option<String>,
    pub home_team_xg: Option<f64>,
    pub away_team_xg: Option<f64>,
    pub score: Option<String>,
    pub attendance: Option<i64>,
    pub venue: Option<String>,
    pub referee: Option<String>,
    pub match_report_link: Option<String>,
    pub notes: String,
}

impl Fixture {
    /// Identity used to drop the same game listed in several tables.
    pub fn dedup_key(&self) -> (String, String, String) {
        (
            self.date.clone(),
            self.home_team.clone(),
            self.away_team.clone(),
        )
    }
}

// =============================================================================
// Match reports
// =============================================================================

/// A value per side of a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sides<T> {
    pub home_team: T,
    pub away_team: T,
}

impl<T> Sides<T> {
    pub fn side_mut(&mut self, home: bool) -> &mut T {
        if home {
            &mut self.home_team
        } else {
            &mut self.away_team
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupPlayer {
    pub name: String,
    pub player_id: String,
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lineup {
    pub start: Sides<Vec<LineupPlayer>>,
    pub bench: Sides<Vec<LineupPlayer>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EventKind {
    Goal,
    #[serde(rename = "Yellow Card")]
    YellowCard,
    #[serde(rename = "Red Card")]
    RedCard,
    Substitute,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvent {
    /// Position in the event list, starting at 1.
    pub number: usize,
    pub minute: String,
    pub score: Option<String>,
    pub event: EventKind,
    pub player: Option<String>,
    pub assist_player: Option<String>,
    pub substitute_for: Option<String>,
}

/// Team-level stat name to value.
pub type TeamStats = BTreeMap<String, SqlValue>;

/// One player's stats in one category.
pub type PlayerStatRow = BTreeMap<String, SqlValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatCategory {
    Summary,
    Passing,
    PassTypes,
    Defense,
    Possession,
    Miscellaneous,
    Goalkeeper,
}

impl PlayerStatCategory {
    /// Outfield categories, in the order they appear per team.
    pub const OUTFIELD: [PlayerStatCategory; 6] = [
        PlayerStatCategory::Summary,
        PlayerStatCategory::Passing,
        PlayerStatCategory::PassTypes,
        PlayerStatCategory::Defense,
        PlayerStatCategory::Possession,
        PlayerStatCategory::Miscellaneous,
    ];

    /// Suffix of the `div_stats_{team}_{suffix}` container.
    pub fn div_suffix(&self) -> &'static str {
        match self {
            PlayerStatCategory::Summary => "summary",
            PlayerStatCategory::Passing => "passing",
            PlayerStatCategory::PassTypes => "passing_types",
            PlayerStatCategory::Defense => "defense",
            PlayerStatCategory::Possession => "possession",
            PlayerStatCategory::Miscellaneous => "misc",
            PlayerStatCategory::Goalkeeper => "keeper",
        }
    }

    /// Storage column for the category.
    pub fn column(&self) -> &'static str {
        match self {
            PlayerStatCategory::Summary => "player_summary_stats",
            PlayerStatCategory::Passing => "player_passing_stats",
            PlayerStatCategory::PassTypes => "player_pass_types_stats",
            PlayerStatCategory::Defense => "player_defense_stats",
            PlayerStatCategory::Possession => "player_possession_stats",
            PlayerStatCategory::Miscellaneous => "player_miscellaneous_stats",
            PlayerStatCategory::Goalkeeper => "player_goalkeeper_stats",
        }
    }
}

pub type PlayerStats = BTreeMap<PlayerStatCategory, Sides<Vec<PlayerStatRow>>>;

/// Everything parsed from one match report page. Any section may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    pub match_id: String,
    pub match_link: String,
    pub lineup: Option<Lineup>,
    pub events: Option<Vec<MatchEvent>>,
    pub team_stats: Option<Sides<TeamStats>>,
    pub player_stats: PlayerStats,
}

impl MatchReport {
    pub fn is_empty(&self) -> bool {
        self.lineup.is_none()
            && self.events.is_none()
            && self.team_stats.is_none()
            && self.player_stats.is_empty()
    }
}

/// A fixture whose match report should be scraped, with its competition.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTarget {
    pub competition_id: i64,
    pub competition_name: String,
    pub season: String,
    pub fixture: Fixture,
}
