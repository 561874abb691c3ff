use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::DocumentParser;
use crate::error::{absorb_row, FatalError, RowError, RowResult};
use crate::model::{
    EventKind, Lineup, LineupPlayer, MatchEvent, MatchReport, PlayerStatCategory, PlayerStatRow,
    PlayerStats, Sides, TeamStats,
};
use crate::parser::dom::{
    colspan, data_cells, first_link, head_rows, header_cells, href, links, own_text, row_cells,
    selector, text_of,
};
use crate::parser::locate::{
    div_by_id, div_within, fallback_summary_containers, fallback_table_containers, has_switchers,
    lineup_divs, player_stat_team_ids,
};
use crate::parser::mapping::{
    country_name, stat_field_name, team_stat_name, NUMERIC_KEEPER_STATS, NUMERIC_PLAYER_STATS,
};
use crate::parser::record::{coerce_stat, match_id, parse_percentage, player_id};
use crate::parser::SqlValue;

static DIV: Lazy<Selector> = Lazy::new(|| selector("div"));
static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
static TH: Lazy<Selector> = Lazy::new(|| selector("th"));
static SPAN: Lazy<Selector> = Lazy::new(|| selector("span"));
static SMALL: Lazy<Selector> = Lazy::new(|| selector("small"));
static EVENT: Lazy<Selector> = Lazy::new(|| selector("div.event"));
static EVENT_ICON: Lazy<Selector> = Lazy::new(|| selector("div.event_icon"));
static EVENT_SCORE: Lazy<Selector> = Lazy::new(|| selector(r#"span[style="color:#666"]"#));
static STATS_TABLE: Lazy<Selector> = Lazy::new(|| selector("table.stats_table"));
static TBODY_ROW: Lazy<Selector> = Lazy::new(|| selector("tbody tr"));
static PLAYER_CELL: Lazy<Selector> = Lazy::new(|| selector(r#"th[data-stat="player"]"#));

static MINUTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\+\d*)?'?)").unwrap());
static ASSIST: Lazy<Regex> = Lazy::new(|| Regex::new(r"Assist:\s*(.+)").unwrap());
static COUNTRY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{3}").unwrap());

/// Stat labels at least this long are not treated as a stat name row.
const MAX_STAT_LABEL: usize = 30;
/// Longer names in the extra stats block are team names, not stats.
const MAX_EXTRA_STAT_NAME: usize = 20;

/// Parses one match report page.
pub struct MatchReportParser {
    pub match_link: String,
}

impl MatchReportParser {
    pub fn new(match_link: impl Into<String>) -> Self {
        Self {
            match_link: match_link.into(),
        }
    }
}

impl DocumentParser for MatchReportParser {
    type Output = MatchReport;

    fn describe(&self) -> String {
        format!("match report {}", self.match_link)
    }

    fn parse(&self, doc: &Html) -> Result<MatchReport, FatalError> {
        let report = MatchReport {
            match_id: match_id(&self.match_link).unwrap_or_default(),
            match_link: self.match_link.clone(),
            lineup: parse_lineup(doc),
            events: parse_events(doc),
            team_stats: parse_team_stats(doc),
            player_stats: parse_player_stats(doc)?,
        };
        info!(
            match_id = %report.match_id,
            lineup = report.lineup.is_some(),
            events = report.events.as_ref().map_or(0, Vec::len),
            team_stats = report.team_stats.is_some(),
            player_stat_categories = report.player_stats.len(),
            "parsed match report"
        );
        Ok(report)
    }
}

// =============================================================================
// Lineups
// =============================================================================

fn parse_lineup(doc: &Html) -> Option<Lineup> {
    let divs = lineup_divs(doc);
    if divs.is_empty() {
        debug!("no lineup divs");
        return None;
    }

    let mut lineup = Lineup::default();
    for div in divs {
        let home = div.value().id() == Some("a");
        let Some(table) = div.select(&TABLE).next() else {
            continue;
        };

        let mut on_bench = false;
        for row in table.select(&ROW) {
            if row
                .select(&TH)
                .next()
                .is_some_and(|th| text_of(th).contains("Bench"))
            {
                on_bench = true;
                continue;
            }

            let cells = data_cells(row);
            if cells.len() < 2 {
                continue;
            }
            let Some(link) = first_link(cells[1]) else {
                continue;
            };
            let player = LineupPlayer {
                name: text_of(link),
                player_id: player_id(href(link)).unwrap_or_default(),
                number: text_of(cells[0]),
            };
            let section = if on_bench {
                &mut lineup.bench
            } else {
                &mut lineup.start
            };
            section.side_mut(home).push(player);
        }
    }

    debug!(
        home_starters = lineup.start.home_team.len(),
        away_starters = lineup.start.away_team.len(),
        "parsed lineup"
    );
    Some(lineup)
}

// =============================================================================
// Events
// =============================================================================

fn event_kind(icon: ElementRef<'_>) -> Option<EventKind> {
    let has = |class: &str| icon.value().classes().any(|c| c == class);
    if has("goal") {
        Some(EventKind::Goal)
    } else if has("yellow_card") {
        Some(EventKind::YellowCard)
    } else if has("red_card") {
        Some(EventKind::RedCard)
    } else if has("substitute_in") || has("substitute_out") {
        Some(EventKind::Substitute)
    } else {
        None
    }
}

fn parse_event(div: ElementRef<'_>, number: usize) -> Option<MatchEvent> {
    let first = div.select(&DIV).next();
    let minute = first
        .and_then(|d| MINUTE.captures(&text_of(d)).map(|c| c[1].to_string()))?;
    let score = first
        .and_then(|d| d.select(&EVENT_SCORE).next())
        .map(text_of);
    let kind = div.select(&EVENT_ICON).next().and_then(event_kind)?;

    let names: Vec<String> = links(div).into_iter().map(text_of).collect();
    let mut event = MatchEvent {
        number,
        minute,
        score,
        event: kind,
        player: names.first().cloned(),
        assist_player: None,
        substitute_for: None,
    };

    match kind {
        EventKind::Substitute => event.substitute_for = names.get(1).cloned(),
        EventKind::Goal if event.player.is_some() => {
            event.assist_player = div
                .select(&SMALL)
                .map(text_of)
                .find(|t| t.contains("Assist:"))
                .and_then(|t| ASSIST.captures(&t).map(|c| c[1].trim().to_string()));
        }
        _ => {}
    }
    Some(event)
}

fn parse_events(doc: &Html) -> Option<Vec<MatchEvent>> {
    let Some(wrap) = div_by_id(doc, "events_wrap") else {
        debug!("no events_wrap div");
        return None;
    };

    let mut events = Vec::new();
    for div in wrap.select(&EVENT) {
        if let Some(event) = parse_event(div, events.len() + 1) {
            events.push(event);
        }
    }
    debug!(count = events.len(), "parsed match events");
    Some(events)
}

// =============================================================================
// Team stats
// =============================================================================

/// Percent stats keep only the percentage; others go through the usual coercion.
fn team_stat_value(name: &str, raw: &str) -> SqlValue {
    if name.ends_with('%') {
        parse_percentage(raw).into()
    } else {
        coerce_stat(raw)
    }
}

fn record_team_stat(stats: &mut Sides<TeamStats>, label: &str, home: &str, away: &str) {
    if let Some(name) = team_stat_name(label) {
        stats.home_team.insert(name.to_string(), team_stat_value(name, home));
        stats.away_team.insert(name.to_string(), team_stat_value(name, away));
    }
}

fn parse_team_stats(doc: &Html) -> Option<Sides<TeamStats>> {
    let container = div_by_id(doc, "team_stats")?;
    let table = container.select(&TABLE).next()?;

    let mut stats = Sides::<TeamStats>::default();
    let mut current: Option<String> = None;

    for (idx, row) in table.select(&ROW).enumerate() {
        let cells = row_cells(row);
        let Some(first) = cells.first() else {
            continue;
        };
        if first.value().name() == "th" && colspan(*first) == 2 {
            current = Some(text_of(*first).to_lowercase());
            continue;
        }
        // Team names
        if idx == 0 {
            continue;
        }

        let texts: Vec<String> = cells.iter().map(|c| text_of(*c)).collect();
        match texts.as_slice() {
            [label] if !label.is_empty() && label.chars().count() < MAX_STAT_LABEL => {
                current = Some(label.to_lowercase());
            }
            [home, away] if !home.is_empty() && !away.is_empty() => {
                if let Some(label) = current.take() {
                    record_team_stat(&mut stats, &label, home, away);
                }
            }
            _ => {}
        }
    }

    if let Some(extra) = div_by_id(doc, "team_stats_extra") {
        parse_team_stats_extra(extra, &mut stats);
    }

    debug!(count = stats.home_team.len(), "parsed team stats");
    Some(stats)
}

/// The extra block lays out `home value, name, away value` triples after two
/// team name cells, one group per div.
fn parse_team_stats_extra(extra: ElementRef<'_>, stats: &mut Sides<TeamStats>) {
    for group in extra.select(&DIV) {
        if text_of(group).is_empty() {
            continue;
        }
        let inner: Vec<ElementRef<'_>> = group.select(&DIV).collect();
        if inner.len() < 3 {
            continue;
        }
        let texts: Vec<String> = inner
            .into_iter()
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect();
        let start = if texts.len() >= 2 { 2 } else { 0 };

        for triple in texts[start..].chunks_exact(3) {
            let (home, name, away) = (&triple[0], &triple[1], &triple[2]);
            if name.chars().count() > MAX_EXTRA_STAT_NAME
                || name.chars().all(|c| c.is_ascii_digit())
            {
                continue;
            }
            record_team_stat(stats, name, home, away);
        }
    }
}

// =============================================================================
// Player stats
// =============================================================================

fn parse_player_stats(doc: &Html) -> Result<PlayerStats, FatalError> {
    let mut stats = PlayerStats::new();

    if has_switchers(doc) {
        for (idx, team_id) in player_stat_team_ids(doc).iter().enumerate() {
            let home = idx == 0;
            let Some(switcher) = div_by_id(doc, &format!("switcher_player_stats_{team_id}")) else {
                continue;
            };

            for category in PlayerStatCategory::OUTFIELD {
                let id = format!("div_stats_{team_id}_{}", category.div_suffix());
                if let Some(container) = div_within(switcher, &id) {
                    let rows = parse_stats_table(container, NUMERIC_PLAYER_STATS)?;
                    *stats.entry(category).or_default().side_mut(home) = rows;
                }
            }

            if let Some(container) = div_by_id(doc, &format!("div_keeper_stats_{team_id}")) {
                let rows = parse_stats_table(container, NUMERIC_KEEPER_STATS)?;
                *stats
                    .entry(PlayerStatCategory::Goalkeeper)
                    .or_default()
                    .side_mut(home) = rows;
            }
        }
        return Ok(stats);
    }

    let summaries = fallback_summary_containers(doc);
    for (idx, container) in summaries.iter().enumerate() {
        let rows = parse_stats_table(*container, NUMERIC_PLAYER_STATS)?;
        *stats
            .entry(PlayerStatCategory::Summary)
            .or_default()
            .side_mut(idx == 0) = rows;
    }

    // Containers 0 and 2 hold the outfield summaries.
    for (idx, container) in fallback_table_containers(doc).iter().enumerate() {
        if idx == 0 || idx == 2 {
            continue;
        }
        let rows = parse_stats_table(*container, NUMERIC_KEEPER_STATS)?;
        *stats
            .entry(PlayerStatCategory::Goalkeeper)
            .or_default()
            .side_mut(idx == 1) = rows;
    }
    Ok(stats)
}

/// `data-stat` names from the last header row, the one below any over-header.
fn stat_headers(table: ElementRef<'_>) -> Vec<String> {
    head_rows(table)
        .last()
        .map(|row| {
            header_cells(*row)
                .into_iter()
                .filter_map(|th| th.value().attr("data-stat").map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_stats_table(
    container: ElementRef<'_>,
    numeric: &[&str],
) -> Result<Vec<PlayerStatRow>, FatalError> {
    let Some(table) = container.select(&STATS_TABLE).next() else {
        return Ok(Vec::new());
    };
    let headers = stat_headers(table);
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for row in table.select(&TBODY_ROW) {
        let parsed = parse_stat_row(row, &headers, numeric);
        if let Some(record) = absorb_row(parsed, "player stats row")? {
            rows.push(record);
        }
    }
    Ok(rows)
}

fn parse_stat_row(
    row: ElementRef<'_>,
    headers: &[String],
    numeric: &[&str],
) -> RowResult<PlayerStatRow> {
    let mut record = PlayerStatRow::new();

    let player_link = row.select(&PLAYER_CELL).next().and_then(first_link);
    if let Some(link) = player_link {
        record.insert("player_name".to_string(), text_of(link).into());
        let url = href(link);
        if let Some((_, rest)) = url.split_once("/players/") {
            let id = rest.split('/').next().unwrap_or_default();
            record.insert("player_id".to_string(), id.into());
        }
    }

    for (cell, stat) in row_cells(row).into_iter().zip(headers) {
        let text = text_of(cell);
        if text.is_empty() || stat == "player" {
            continue;
        }
        let value = if stat == "nationality" {
            nationality(cell)?.into()
        } else if numeric.contains(&stat.as_str()) {
            numeric_stat(&text)
        } else {
            text.into()
        };
        record.insert(stat_field_name(stat), value);
    }

    if !record.contains_key("player_name") {
        return Err(RowError::MissingField("player_name"));
    }
    Ok(record)
}

/// Country name for a nationality cell. A code missing from the mapping stops
/// the run so the mapping can be extended.
fn nationality(cell: ElementRef<'_>) -> RowResult<String> {
    let Some(span) = first_link(cell).and_then(|a| a.select(&SPAN).next()) else {
        return Ok(text_of(cell));
    };
    let own = own_text(span);
    let code = if own.is_empty() {
        match COUNTRY_CODE.find(&text_of(span)) {
            Some(m) => m.as_str().to_string(),
            None => return Ok(text_of(span)),
        }
    } else {
        own
    };
    match country_name(&code) {
        Some(name) => Ok(name.to_string()),
        None => Err(FatalError::UnmappedNationality { code }.into()),
    }
}

/// Numeric stat: percentages and decimals to floats, others to integers, raw
/// text when neither parses.
fn numeric_stat(text: &str) -> SqlValue {
    let parsed = if text.contains('%') {
        text.replace('%', "").trim().parse::<f64>().ok().map(SqlValue::Real)
    } else if text.contains('.') {
        text.parse::<f64>().ok().map(SqlValue::Real)
    } else {
        text.parse::<i64>().ok().map(SqlValue::Integer)
    };
    parsed.unwrap_or_else(|| SqlValue::Text(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "https://fbref.com/en/matches/cc5b4244/Manchester-United-Fulham";

    fn parse(html: &str) -> Result<MatchReport, FatalError> {
        MatchReportParser::new(LINK).parse(&Html::parse_document(html))
    }

    #[test]
    fn test_empty_page_gives_empty_report() {
        let report = parse("<html><body><p>nothing here</p></body></html>").unwrap();
        assert_eq!(report.match_id, "cc5b4244");
        assert_eq!(report.match_link, LINK);
        assert!(report.is_empty());
    }

    #[test]
    fn test_lineup_sections() {
        let report = parse(
            r#"<div class="lineup" id="a"><table>
                 <tr><th colspan="2">Manchester Utd (4-2-3-1)</th></tr>
                 <tr><td>24</td><td><a href="/en/players/a1b2c3d4/Andre-Onana">André Onana</a></td></tr>
                 <tr><th colspan="2">Bench</th></tr>
                 <tr><td>1</td><td><a href="/en/players/e5f6a7b8/Altay-Bayindir">Altay Bayındır</a></td></tr>
                 <tr><td>99</td><td>Unlinked</td></tr>
               </table></div>
               <div class="lineup" id="b"><table>
                 <tr><td>17</td><td><a href="/en/players/ffff0000/Bernd-Leno">Bernd Leno</a></td></tr>
               </table></div>"#,
        )
        .unwrap();
        let lineup = report.lineup.unwrap();
        assert_eq!(lineup.start.home_team.len(), 1);
        assert_eq!(lineup.start.home_team[0].name, "André Onana");
        assert_eq!(lineup.start.home_team[0].player_id, "a1b2c3d4");
        assert_eq!(lineup.start.home_team[0].number, "24");
        assert_eq!(lineup.bench.home_team.len(), 1);
        assert_eq!(lineup.bench.home_team[0].number, "1");
        assert_eq!(lineup.start.away_team[0].name, "Bernd Leno");
        assert!(lineup.bench.away_team.is_empty());
    }

    #[test]
    fn test_events() {
        let report = parse(
            r#"<div id="events_wrap">
                 <div class="event a">
                   <div>&rsquo;87&rsquo; <span style="color:#666">1:0</span></div>
                   <div class="event_icon goal"></div>
                   <div><a href="/en/players/1/">Joshua Zirkzee</a>
                     <small>Assist: Alejandro Garnacho</small></div>
                 </div>
                 <div class="event b">
                   <div>61&rsquo;</div>
                   <div class="event_icon substitute_in"></div>
                   <div><a href="/en/players/2/">Emile Smith Rowe</a></div>
                 </div>
                 <div class="event a">
                   <div>no minute</div>
                   <div class="event_icon yellow_card"></div>
                 </div>
                 <div class="event a">
                   <div>90+2</div>
                   <div class="event_icon penalty_miss"></div>
                 </div>
                 <div class="event b">
                   <div>90+3</div>
                   <div class="event_icon yellow_card"></div>
                   <div><a href="/en/players/3/">Calvin Bassey</a></div>
                 </div>
               </div>"#,
        )
        .unwrap();
        let events = report.events.unwrap();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].number, 1);
        assert_eq!(events[0].minute, "87");
        assert_eq!(events[0].score.as_deref(), Some("1:0"));
        assert_eq!(events[0].event, EventKind::Goal);
        assert_eq!(events[0].player.as_deref(), Some("Joshua Zirkzee"));
        assert_eq!(events[0].assist_player.as_deref(), Some("Alejandro Garnacho"));

        assert_eq!(events[1].event, EventKind::Substitute);
        assert_eq!(events[1].player.as_deref(), Some("Emile Smith Rowe"));
        assert_eq!(events[1].substitute_for, None);

        assert_eq!(events[2].number, 3);
        assert_eq!(events[2].minute, "90+3");
        assert_eq!(events[2].event, EventKind::YellowCard);
    }

    #[test]
    fn test_team_stats_table_and_extra() {
        let report = parse(
            r#"<div id="team_stats"><table>
                 <tr><th>Manchester Utd</th><th>Fulham</th></tr>
                 <tr><th colspan="2">Possession</th></tr>
                 <tr><td>62%</td><td>38%</td></tr>
                 <tr><th colspan="2">Passing Accuracy</th></tr>
                 <tr><td>326 of 412 &mdash; 79%</td><td>69%&mdash; 200 of 290</td></tr>
                 <tr><th colspan="2">Cards</th></tr>
                 <tr><td>2</td><td>1</td></tr>
               </table></div>
               <div id="team_stats_extra">
                 <div><div>Manchester Utd</div><div></div><div>Fulham</div>
                   <div>12</div><div>Fouls</div><div>10</div>
                   <div>7</div><div>Corners</div><div>3</div></div>
               </div>"#,
        )
        .unwrap();
        let stats = report.team_stats.unwrap();
        assert_eq!(stats.home_team["possession%"], SqlValue::Real(62.0));
        assert_eq!(stats.away_team["possession%"], SqlValue::Real(38.0));
        assert_eq!(stats.home_team["passing_accuracy%"], SqlValue::Real(79.0));
        assert_eq!(stats.away_team["passing_accuracy%"], SqlValue::Real(69.0));
        assert_eq!(stats.home_team["cards"], SqlValue::Integer(2));
        assert_eq!(stats.home_team["fouls"], SqlValue::Integer(12));
        assert_eq!(stats.away_team["corners"], SqlValue::Integer(3));
    }

    fn summary_table(nationality: &str) -> String {
        format!(
            r##"<div class="filter switcher" data-controls="#switcher_player_stats_19538871"></div>
               <div id="switcher_player_stats_19538871">
                 <div id="div_stats_19538871_summary">
                   <table class="stats_table">
                     <thead>
                       <tr class="over_header"><th colspan="3"></th><th colspan="2">Performance</th></tr>
                       <tr><th data-stat="player">Player</th><th data-stat="nationality">Nation</th>
                           <th data-stat="minutes">Min</th><th data-stat="xg">xG</th><th data-stat="position">Pos</th></tr>
                     </thead>
                     <tbody>
                       <tr><th data-stat="player"><a href="/en/players/a1b2c3d4/Andre-Onana">André Onana</a></th>
                           <td data-stat="nationality"><a href="/en/country/CMR/"><span><span class="f-i">cm</span> {nationality}</span></a></td>
                           <td>90</td><td>0.0</td><td>GK</td></tr>
                       <tr class="thead"><th>Player</th><td></td><td></td><td></td><td></td></tr>
                     </tbody>
                   </table>
                 </div>
               </div>"##
        )
    }

    #[test]
    fn test_player_stats_with_switchers() {
        let report = parse(&summary_table("CMR")).unwrap();
        let summary = &report.player_stats[&PlayerStatCategory::Summary];
        assert_eq!(summary.home_team.len(), 1);
        assert!(summary.away_team.is_empty());
        let row = &summary.home_team[0];
        assert_eq!(row["player_name"], SqlValue::Text("André Onana".into()));
        assert_eq!(row["player_id"], SqlValue::Text("a1b2c3d4".into()));
        assert_eq!(row["nationality"], SqlValue::Text("Cameroon".into()));
        assert_eq!(row["minutes"], SqlValue::Integer(90));
        assert_eq!(row["expected_goals"], SqlValue::Real(0.0));
        assert_eq!(row["position"], SqlValue::Text("GK".into()));
        assert!(!row.contains_key("player"));
    }

    #[test]
    fn test_unmapped_nationality_is_fatal() {
        let err = parse(&summary_table("ZZZ")).unwrap_err();
        assert_eq!(
            err,
            FatalError::UnmappedNationality {
                code: "ZZZ".to_string()
            }
        );
    }

    #[test]
    fn test_numeric_stat() {
        assert_eq!(numeric_stat("90"), SqlValue::Integer(90));
        assert_eq!(numeric_stat("1.4"), SqlValue::Real(1.4));
        assert_eq!(numeric_stat("81.3%"), SqlValue::Real(81.3));
        assert_eq!(numeric_stat("1,234"), SqlValue::Text("1,234".into()));
    }
}
