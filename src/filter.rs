//! Which seasons a pipeline run touches.

use chrono::{Datelike, Local, NaiveDate};
use tracing::warn;

/// First month in which a `{y}-{y+1}` season counts as the current one.
const SEASON_START_MONTH: u32 = 7;

/// Starting year of a season label: `2024` or `2024-2025`.
pub fn season_start_year(season: &str) -> Option<i32> {
    let first = season.split('-').next()?.trim();
    first.parse().ok()
}

/// True when the season starts no earlier than `current_year - years_back`.
/// Unparseable labels are outside every window; a window reaching past the
/// earliest representable year covers every season.
pub fn within_years_back(season: &str, years_back: u32, current_year: i32) -> bool {
    let Some(start) = season_start_year(season) else {
        warn!(season, "could not parse season label");
        return false;
    };
    match i32::try_from(years_back)
        .ok()
        .and_then(|back| current_year.checked_sub(back))
    {
        Some(earliest) => start >= earliest,
        None => true,
    }
}

/// Season labels still in progress on `today`.
pub fn current_seasons(today: NaiveDate) -> Vec<String> {
    let y = today.year();
    let mut seasons = vec![format!("{}-{}", y, y + 1), y.to_string()];
    if today.month() < SEASON_START_MONTH {
        seasons.push(format!("{}-{}", y - 1, y));
    }
    seasons
}

pub fn is_current_season(season: &str, today: NaiveDate) -> bool {
    current_seasons(today).iter().any(|s| s == season)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Schedule page for a season stats page:
/// `/en/comps/9/2024-2025/2024-2025-Premier-League-Stats` becomes
/// `/en/comps/9/2024-2025/schedule/2024-2025-Premier-League-Scores-and-Fixtures`.
/// Links of any other shape are returned unchanged.
pub fn fixture_link(season_link: &str) -> String {
    if let Some(stem) = season_link.strip_suffix("-Stats") {
        let converted = format!("{stem}-Scores-and-Fixtures");
        let mut parts: Vec<&str> = converted.split('/').collect();
        if parts.len() >= 5 {
            parts.insert(parts.len() - 1, "schedule");
            return parts.join("/");
        }
    }
    warn!(season_link, "could not convert season link to fixture link");
    season_link.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_window() {
        assert!(within_years_back("2025-2026", 1, 2026));
        assert!(within_years_back("2026", 1, 2026));
        assert!(!within_years_back("2024-2025", 1, 2026));
        assert!(within_years_back("2016-2017", 10, 2026));
        assert!(!within_years_back("Spring", 10, 2026));
    }

    #[test]
    fn test_huge_window_covers_every_season() {
        assert!(within_years_back("1888-1889", u32::MAX, 2026));
        assert!(within_years_back("1930", 2_147_483_648, 2026));
        assert!(within_years_back("1930", i32::MAX as u32, -5));
        assert!(!within_years_back("Spring", u32::MAX, 2026));
    }

    #[test]
    fn test_current_seasons() {
        assert_eq!(
            current_seasons(date(2026, 3, 1)),
            vec!["2026-2027", "2026", "2025-2026"]
        );
        assert_eq!(current_seasons(date(2026, 10, 19)), vec!["2026-2027", "2026"]);
        assert!(is_current_season("2025-2026", date(2026, 5, 1)));
        assert!(!is_current_season("2025-2026", date(2026, 8, 1)));
    }

    #[test]
    fn test_fixture_link() {
        assert_eq!(
            fixture_link("/en/comps/9/2024-2025/2024-2025-Premier-League-Stats"),
            "/en/comps/9/2024-2025/schedule/2024-2025-Premier-League-Scores-and-Fixtures"
        );
        assert_eq!(
            fixture_link("/en/comps/9/Premier-League-Stats"),
            "/en/comps/9/schedule/Premier-League-Scores-and-Fixtures"
        );
        assert_eq!(fixture_link("/en/comps/9/history/"), "/en/comps/9/history/");
    }
}
