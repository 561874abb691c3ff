//! Header normalization tables.
//!
//! Every rule set here is plain data evaluated top-to-bottom, first match wins.

use std::collections::HashMap;

/// Mapping from canonical field name to column index.
pub type HeaderMap = HashMap<String, usize>;

// =============================================================================
// Standings
// =============================================================================

/// Exact header text (lowercased) to canonical standings field.
pub const STANDINGS_HEADERS: &[(&str, &str)] = &[
    ("rk", "rank"),
    ("squad", "team"),
    ("mp", "matches_played"),
    ("w", "wins"),
    ("d", "draws"),
    ("l", "losses"),
    ("gf", "goals_for"),
    ("ga", "goals_against"),
    ("gd", "goal_difference"),
    ("pts", "points"),
    ("pts/mp", "points_per_match_played"),
    ("xg", "expected_goals"),
    ("xga", "expected_goals_allowed"),
    ("xgd", "expected_goals_difference"),
    ("xgd/90", "expected_goals_difference_per_90_minutes"),
    ("attendance", "attendance"),
    ("top team scorer", "top_team_scorer"),
    ("goalkeeper", "goalkeeper"),
    ("notes", "notes"),
];

/// Canonical name for a standings header. Unknown headers keep their lowercased text.
pub fn normalize_standings_header(text: &str) -> String {
    let t = text.trim().to_lowercase();
    STANDINGS_HEADERS
        .iter()
        .find(|(raw, _)| *raw == t)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(t)
}

/// Build the standings header map. Later duplicates overwrite earlier ones.
pub fn standings_header_map<'a>(headers: impl IntoIterator<Item = &'a str>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (idx, text) in headers.into_iter().enumerate() {
        let norm = normalize_standings_header(text);
        if !norm.is_empty() {
            map.insert(norm, idx);
        }
    }
    map
}

// =============================================================================
// Fixtures
// =============================================================================

/// Keywords a header text must contain.
#[derive(Debug, Clone, Copy)]
pub enum Keywords {
    AnyOf(&'static [&'static str]),
    AllOf(&'static [&'static str]),
}

/// Extra condition checked against the raw cell markup (attributes included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    None,
    Markup(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    pub keywords: Keywords,
    pub probe: Probe,
    pub field: &'static str,
}

const fn any(words: &'static [&'static str], field: &'static str) -> HeaderRule {
    HeaderRule {
        keywords: Keywords::AnyOf(words),
        probe: Probe::None,
        field,
    }
}

/// Ordered fixture header rules. The `xg` rules tell home from away by the
/// cell markup, so they sit between the team and score rules.
pub const FIXTURE_RULES: &[HeaderRule] = &[
    any(&["round"], "round"),
    any(&["wk", "week"], "week"),
    any(&["day"], "day"),
    any(&["date"], "date"),
    any(&["time"], "time"),
    any(&["home"], "home_team"),
    HeaderRule {
        keywords: Keywords::AnyOf(&["xg"]),
        probe: Probe::Markup("home"),
        field: "home_xg",
    },
    any(&["score"], "score"),
    HeaderRule {
        keywords: Keywords::AnyOf(&["xg"]),
        probe: Probe::Markup("away"),
        field: "away_xg",
    },
    any(&["away"], "away_team"),
    any(&["attendance"], "attendance"),
    any(&["venue"], "venue"),
    any(&["referee"], "referee"),
    HeaderRule {
        keywords: Keywords::AllOf(&["match", "report"]),
        probe: Probe::None,
        field: "match_report",
    },
    any(&["notes"], "notes"),
];

/// Columns every fixture table must have.
pub const FIXTURE_ESSENTIALS: &[&str] = &["day", "date", "home_team", "away_team"];

impl HeaderRule {
    fn matches(&self, text: &str, markup: &str) -> bool {
        let keyword_hit = match self.keywords {
            Keywords::AnyOf(words) => words.iter().any(|k| text.contains(k)),
            Keywords::AllOf(words) => words.iter().all(|k| text.contains(k)),
        };
        keyword_hit
            && match self.probe {
                Probe::None => true,
                Probe::Markup(word) => markup.contains(word),
            }
    }
}

/// Field name for a single fixture header cell, if any rule matches.
pub fn classify_fixture_header(text: &str, markup: &str) -> Option<&'static str> {
    let text = text.trim().to_lowercase();
    let markup = markup.to_lowercase();
    FIXTURE_RULES
        .iter()
        .find(|r| r.matches(&text, &markup))
        .map(|r| r.field)
}

/// Build the fixture header map from `(text, markup)` pairs. Returns `None`
/// when any essential column is missing.
pub fn fixture_header_map<'a>(
    cells: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Option<HeaderMap> {
    let mut map = HeaderMap::new();
    for (idx, (text, markup)) in cells.into_iter().enumerate() {
        if let Some(field) = classify_fixture_header(text, markup) {
            map.insert(field.to_string(), idx);
        }
    }
    if FIXTURE_ESSENTIALS.iter().all(|f| map.contains_key(*f)) {
        Some(map)
    } else {
        None
    }
}

// =============================================================================
// Season listings
// =============================================================================

/// Keyword rules for season listing headers, first match wins.
pub const SEASON_RULES: &[(&[&str], &str)] = &[
    (&["season", "year"], "season"),
    (&["host"], "host_country"),
    (&["# squads", "squads"], "num_squads"),
    (&["runner"], "runner_up"),
    (&["champion"], "champion"),
    (&["top scorer"], "top_scorer"),
];

pub fn season_header_map<'a>(headers: impl IntoIterator<Item = &'a str>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (idx, text) in headers.into_iter().enumerate() {
        let t = text.trim().to_lowercase();
        let hit = SEASON_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|k| t.contains(k)));
        if let Some((_, field)) = hit {
            map.entry(field.to_string()).or_insert(idx);
        }
    }
    map
}
