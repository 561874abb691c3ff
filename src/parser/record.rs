use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{RowError, RowResult};

/// A parsed row ready for insertion
pub struct ParsedRow {
    pub values: HashMap<String, SqlValue>,
}

impl ParsedRow {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set(&mut self, column: &str, value: impl Into<SqlValue>) -> &mut Self {
        self.values.insert(column.to_string(), value.into());
        self
    }
}

impl Default for ParsedRow {
    fn default() -> Self {
        Self::new()
    }
}

/// A dynamically typed cell value. Also used for values whose type depends on
/// the markup (ranks, signed differences, per-player stats).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }

    /// Read back a column of unknown storage class.
    pub fn from_ref(value: rusqlite::types::ValueRef<'_>) -> Self {
        use rusqlite::types::ValueRef;
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(i) => SqlValue::Integer(i),
            ValueRef::Real(f) => SqlValue::Real(f),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                SqlValue::Text(String::from_utf8_lossy(t).into_owned())
            }
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

// =============================================================================
// Identifiers
// =============================================================================

static COMPETITION_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/comps/(\d+)/").unwrap());
static SQUAD_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/squads/([a-f0-9]+)/").unwrap());
static PLAYER_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/players/([^/]+)/").unwrap());
static MATCH_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/matches/([^/]+)/").unwrap());

pub fn competition_id(link: &str) -> Option<i64> {
    COMPETITION_ID
        .captures(link)
        .and_then(|c| c[1].parse().ok())
}

pub fn squad_id(link: &str) -> Option<String> {
    SQUAD_ID.captures(link).map(|c| c[1].to_string())
}

pub fn player_id(link: &str) -> Option<String> {
    PLAYER_ID.captures(link).map(|c| c[1].to_string())
}

pub fn match_id(link: &str) -> Option<String> {
    MATCH_ID.captures(link).map(|c| c[1].to_string())
}

// =============================================================================
// Rank
// =============================================================================

/// Knockout and stage markers used in tournament standings.
pub const RANK_LABELS: &[(&str, RankLabel)] = &[
    ("W", RankLabel::Position(1)),
    ("F", RankLabel::Position(2)),
    ("SF", RankLabel::Stage("semi-final")),
    ("QF", RankLabel::Stage("quarter-final")),
    ("R16", RankLabel::Stage("round of 16")),
    ("R32", RankLabel::Stage("round of 32")),
    ("KO", RankLabel::Stage("knockout")),
    ("GR", RankLabel::Stage("group stage")),
    ("GR1", RankLabel::Stage("first group stage")),
    ("GR2", RankLabel::Stage("second group stage")),
    ("Rd1", RankLabel::Stage("first round")),
    ("Rd2", RankLabel::Stage("second round")),
    ("Lg", RankLabel::Stage("league stage")),
];

#[derive(Debug, Clone, Copy)]
pub enum RankLabel {
    Position(i64),
    Stage(&'static str),
}

/// Parse a rank cell. Never fails: digits become an integer, known markers
/// are mapped, anything else is kept verbatim and an empty cell is null.
pub fn parse_rank(text: &str) -> SqlValue {
    let t = text.trim();
    if t.is_empty() {
        return SqlValue::Null;
    }
    if is_digits(t) {
        return t
            .parse::<i64>()
            .map(SqlValue::Integer)
            .unwrap_or_else(|_| SqlValue::Text(t.to_string()));
    }
    match RANK_LABELS.iter().find(|(marker, _)| *marker == t) {
        Some((_, RankLabel::Position(p))) => SqlValue::Integer(*p),
        Some((_, RankLabel::Stage(label))) => SqlValue::Text(label.to_string()),
        None => SqlValue::Text(t.to_string()),
    }
}

// =============================================================================
// Top scorer
// =============================================================================

/// One or several joint top scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scorers {
    One(String),
    Many(Vec<String>),
}

impl Scorers {
    /// Flattened form for a single TEXT column.
    pub fn joined(&self) -> String {
        match self {
            Scorers::One(name) => name.clone(),
            Scorers::Many(names) => names.join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopScorer {
    pub scorer: Scorers,
    pub goals: Option<i64>,
}

/// Parse "Name[, Name...] - N". Without a usable hyphen the whole text is the
/// scorer and the goal count is unknown.
pub fn parse_top_scorer(text: &str) -> Option<TopScorer> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }

    match t.rsplit_once('-') {
        Some((names, goals)) if !t.starts_with('-') => {
            let names = names.trim();
            let scorer = if names.contains(',') {
                Scorers::Many(names.split(',').map(|n| n.trim().to_string()).collect())
            } else {
                Scorers::One(names.to_string())
            };
            Some(TopScorer {
                scorer,
                goals: goals.trim().parse().ok(),
            })
        }
        _ => Some(TopScorer {
            scorer: Scorers::One(t.to_string()),
            goals: None,
        }),
    }
}

// =============================================================================
// Numeric coercion
// =============================================================================

pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn has_sign(s: &str) -> bool {
    s.contains('+') || s.contains('-')
}

/// Integer coercion for standings cells. Signed values stay as raw text,
/// thousands separators are dropped, anything else non-numeric is null.
pub fn coerce_int(text: &str) -> SqlValue {
    let t = text.trim();
    if t.is_empty() {
        return SqlValue::Null;
    }
    if has_sign(t) {
        return SqlValue::Text(t.to_string());
    }
    let cleaned = t.replace(',', "");
    if is_digits(&cleaned) {
        cleaned.parse().map(SqlValue::Integer).unwrap_or(SqlValue::Null)
    } else {
        SqlValue::Null
    }
}

/// Float coercion for standings cells. Signed values stay as raw text; an
/// unparseable unsigned value fails the row.
pub fn coerce_float(field: &str, text: &str) -> RowResult<SqlValue> {
    let t = text.trim();
    if t.is_empty() {
        return Ok(SqlValue::Null);
    }
    if has_sign(t) {
        return Ok(SqlValue::Text(t.to_string()));
    }
    t.parse::<f64>()
        .map(SqlValue::Real)
        .map_err(|_| RowError::InvalidNumber {
            field: field.to_string(),
            value: t.to_string(),
        })
}

/// Unsigned count with digits only, e.g. "# Squads".
pub fn parse_count(text: &str) -> Option<i64> {
    let t = text.trim();
    if is_digits(t) {
        t.parse().ok()
    } else {
        None
    }
}

/// Keep digits and '-' then parse, as used for week numbers and attendance.
pub fn parse_loose_int(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        cleaned.parse().ok()
    }
}

/// Best-effort stat value: int, then float, then the raw string.
pub fn coerce_stat(text: &str) -> SqlValue {
    let t = text.trim();
    if t.is_empty() {
        return SqlValue::Null;
    }
    if t.contains('%') {
        let stripped = t.replace('%', "");
        return stripped
            .trim()
            .parse::<f64>()
            .map(SqlValue::Real)
            .unwrap_or_else(|_| SqlValue::Text(t.to_string()));
    }
    if let Ok(i) = t.parse::<i64>() {
        return SqlValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return SqlValue::Real(f);
    }
    SqlValue::Text(t.to_string())
}

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)%").unwrap());

/// Percentage portion of a compound stat such as "326 of 412 — 79%".
pub fn parse_percentage(text: &str) -> Option<f64> {
    let t = text.trim();
    if let Some((_, tail)) = t.rsplit_once('—') {
        let tail = tail.trim().trim_end_matches('%').trim();
        if let Ok(p) = tail.parse::<f64>() {
            return Some(p);
        }
    }
    PERCENT
        .captures(t)
        .and_then(|c| c[1].parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rank_labels() {
        assert_eq!(parse_rank("W"), SqlValue::Integer(1));
        assert_eq!(parse_rank("F"), SqlValue::Integer(2));
        assert_eq!(parse_rank("SF"), SqlValue::Text("semi-final".into()));
        assert_eq!(parse_rank("QF"), SqlValue::Text("quarter-final".into()));
        assert_eq!(parse_rank("R16"), SqlValue::Text("round of 16".into()));
        assert_eq!(parse_rank("GR2"), SqlValue::Text("second group stage".into()));
        assert_eq!(parse_rank("Lg"), SqlValue::Text("league stage".into()));
        for (marker, _) in RANK_LABELS {
            assert_ne!(parse_rank(marker), SqlValue::Null);
        }
    }

    #[test]
    fn test_parse_rank_digits_and_raw() {
        assert_eq!(parse_rank("17"), SqlValue::Integer(17));
        assert_eq!(parse_rank(" 3 "), SqlValue::Integer(3));
        assert_eq!(parse_rank("Rd3"), SqlValue::Text("Rd3".into()));
        assert_eq!(parse_rank(""), SqlValue::Null);
        // Overflowing digits never panic
        assert_eq!(
            parse_rank("99999999999999999999999"),
            SqlValue::Text("99999999999999999999999".into())
        );
    }

    #[test]
    fn test_parse_top_scorer_forms() {
        assert_eq!(
            parse_top_scorer("A, B - 7"),
            Some(TopScorer {
                scorer: Scorers::Many(vec!["A".into(), "B".into()]),
                goals: Some(7)
            })
        );
        assert_eq!(
            parse_top_scorer("A - 5"),
            Some(TopScorer {
                scorer: Scorers::One("A".into()),
                goals: Some(5)
            })
        );
        assert_eq!(
            parse_top_scorer("Erling Haaland"),
            Some(TopScorer {
                scorer: Scorers::One("Erling Haaland".into()),
                goals: None
            })
        );
        assert_eq!(
            parse_top_scorer("Kylian Mbappé - ?"),
            Some(TopScorer {
                scorer: Scorers::One("Kylian Mbappé".into()),
                goals: None
            })
        );
        assert_eq!(parse_top_scorer(""), None);
    }

    #[test]
    fn test_top_scorer_splits_on_last_hyphen() {
        let parsed = parse_top_scorer("Jean-Pierre Papin - 30").unwrap();
        assert_eq!(parsed.scorer, Scorers::One("Jean-Pierre Papin".into()));
        assert_eq!(parsed.goals, Some(30));
    }

    #[test]
    fn test_coerce_int() {
        assert_eq!(coerce_int("25"), SqlValue::Integer(25));
        assert_eq!(coerce_int("54,123"), SqlValue::Integer(54123));
        assert_eq!(coerce_int("+14"), SqlValue::Text("+14".into()));
        assert_eq!(coerce_int("-3"), SqlValue::Text("-3".into()));
        assert_eq!(coerce_int("n/a"), SqlValue::Null);
        assert_eq!(coerce_int(""), SqlValue::Null);
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce_float("xg", "21.4").unwrap(), SqlValue::Real(21.4));
        assert_eq!(coerce_float("xgd", "+3.2").unwrap(), SqlValue::Text("+3.2".into()));
        assert_eq!(coerce_float("xg", "").unwrap(), SqlValue::Null);
        assert!(coerce_float("xg", "abc").is_err());
    }

    #[test]
    fn test_loose_int() {
        assert_eq!(parse_loose_int("60,123"), Some(60123));
        assert_eq!(parse_loose_int("12"), Some(12));
        assert_eq!(parse_loose_int(""), None);
        assert_eq!(parse_loose_int("--"), None);
    }

    #[test]
    fn test_coerce_stat() {
        assert_eq!(coerce_stat("12"), SqlValue::Integer(12));
        assert_eq!(coerce_stat("0.4"), SqlValue::Real(0.4));
        assert_eq!(coerce_stat("81.5%"), SqlValue::Real(81.5));
        assert_eq!(coerce_stat("GK"), SqlValue::Text("GK".into()));
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("326 of 412 — 79%"), Some(79.0));
        assert_eq!(parse_percentage("58%"), Some(58.0));
        assert_eq!(parse_percentage("42.5%"), Some(42.5));
        assert_eq!(parse_percentage("none"), None);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(competition_id("/en/comps/9/history/Premier-League-Seasons"), Some(9));
        assert_eq!(
            squad_id("/en/squads/822bd0ba/2024-2025/Liverpool-Stats"),
            Some("822bd0ba".to_string())
        );
        assert_eq!(
            player_id("/en/players/e342ad68/Mohamed-Salah"),
            Some("e342ad68".to_string())
        );
        assert_eq!(
            match_id("https://fbref.com/en/matches/cc5b4244/Manchester-United-Fulham"),
            Some("cc5b4244".to_string())
        );
        assert_eq!(competition_id("/en/about/"), None);
    }
}
