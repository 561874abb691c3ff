//! Finding the right table or container on a page.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::dom::{elements_by_tag, find_by_id, head_rows, header_cells, selector, text_of};

/// Suffixes tried after `results{comp_id}` when looking for the overall table.
pub const STANDINGS_ID_SUFFIXES: &[&str] = &["", "1", "2", "11", "12", "12A"];

static LINEUP: Lazy<Selector> = Lazy::new(|| selector("div.lineup"));
static SWITCHER: Lazy<Selector> = Lazy::new(|| selector("div.filter.switcher"));
static TABBED_CURRENT: Lazy<Selector> =
    Lazy::new(|| selector("div.table_container.tabbed.current"));
static TABLE_CONTAINER: Lazy<Selector> = Lazy::new(|| selector("div.table_container"));

pub fn table_by_id<'a>(doc: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    find_by_id(doc, "table", id)
}

pub fn div_by_id<'a>(doc: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    find_by_id(doc, "div", id)
}

/// Descendant div of `scope` with the given id.
pub fn div_within<'a>(scope: ElementRef<'a>, id: &str) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "div" && el.value().id() == Some(id))
}

pub fn seasons_table(doc: &Html) -> Option<ElementRef<'_>> {
    table_by_id(doc, "seasons")
}

/// The overall standings table.
///
/// Tried in order: a table whose header carries both "Top Team Scorer" and
/// "Goalkeeper", the `results{comp}{suffix}_overall` ids, then any table id
/// containing both "results" and "overall".
pub fn standings_table(doc: &Html, competition_id: i64) -> Option<ElementRef<'_>> {
    for table in elements_by_tag(doc, "table") {
        let headers: Vec<String> = head_rows(table)
            .into_iter()
            .flat_map(header_cells)
            .map(text_of)
            .collect();
        if headers.is_empty() {
            continue;
        }
        let has_scorer = headers.iter().any(|h| h.contains("Top Team Scorer"));
        let has_keeper = headers.iter().any(|h| h.contains("Goalkeeper"));
        if has_scorer && has_keeper {
            info!(id = table.value().id().unwrap_or(""), "found overall table by headers");
            return Some(table);
        }
    }

    for suffix in STANDINGS_ID_SUFFIXES {
        let id = format!("results{competition_id}{suffix}_overall");
        if let Some(table) = table_by_id(doc, &id) {
            info!(id = %id, "found overall table by id");
            return Some(table);
        }
    }

    let fuzzy = elements_by_tag(doc, "table").find(|table| {
        let id = table.value().id().unwrap_or("").to_lowercase();
        id.contains("results") && id.contains("overall")
    });
    if let Some(table) = fuzzy {
        info!(id = table.value().id().unwrap_or(""), "found overall table by fuzzy id");
    }
    fuzzy
}

/// Single schedule table of a league season.
pub fn league_fixture_table<'a>(
    doc: &'a Html,
    season: &str,
    competition_id: i64,
) -> Option<ElementRef<'a>> {
    [
        format!("sched_{season}_{competition_id}_1"),
        format!("sched_{season}_{competition_id}"),
    ]
    .iter()
    .find_map(|id| {
        let table = table_by_id(doc, id);
        if table.is_some() {
            debug!(id = %id, "found league fixtures table");
        }
        table
    })
}

/// Schedule tables of a tournament season: `sched_all`, otherwise the numbered
/// per-stage tables that exist.
pub fn tournament_fixture_tables<'a>(
    doc: &'a Html,
    season: &str,
    competition_id: i64,
) -> Vec<ElementRef<'a>> {
    if let Some(all) = table_by_id(doc, "sched_all") {
        debug!("found consolidated tournament table sched_all");
        return vec![all];
    }
    ["1", "2", "3"]
        .iter()
        .filter_map(|n| table_by_id(doc, &format!("sched_{season}_{competition_id}_{n}")))
        .collect()
}

// =============================================================================
// Match report containers
// =============================================================================

pub fn lineup_divs(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.select(&LINEUP).collect()
}

/// Team ids named by the player-stat switchers, in page order (home first).
pub fn player_stat_team_ids(doc: &Html) -> Vec<String> {
    doc.select(&SWITCHER)
        .filter_map(|div| div.value().attr("data-controls"))
        .filter(|controls| controls.starts_with("#switcher_player_stats"))
        .filter_map(|controls| controls.split('_').nth(3).map(str::to_string))
        .collect()
}

pub fn has_switchers(doc: &Html) -> bool {
    doc.select(&SWITCHER).next().is_some()
}

/// Summary containers used when the page has no switchers.
pub fn fallback_summary_containers(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.select(&TABBED_CURRENT).collect()
}

pub fn fallback_table_containers(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.select(&TABLE_CONTAINER).collect()
}
