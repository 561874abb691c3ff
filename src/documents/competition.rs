use scraper::{ElementRef, Html};
use tracing::{info, warn};

use super::DocumentParser;
use crate::error::{absorb_row, FatalError, RowError, RowResult};
use crate::model::{Award, Competition, CompetitionVariant};
use crate::parser::dom::{body_rows, first_link, href, links, row_cells, text_of};
use crate::parser::locate::table_by_id;
use crate::parser::mapping::country_or_raw;
use crate::parser::record::competition_id;

/// Minimum cells for a listing row to be attempted.
const MIN_CELLS: usize = 6;

/// Parses one listing table of the competitions index page.
pub struct CompetitionListParser {
    pub variant: CompetitionVariant,
}

impl CompetitionListParser {
    pub fn new(variant: CompetitionVariant) -> Self {
        Self { variant }
    }

    fn parse_row(&self, cells: &[ElementRef<'_>]) -> RowResult<Competition> {
        if cells.len() < MIN_CELLS {
            return Err(RowError::TooFewCells {
                found: cells.len(),
                needed: MIN_CELLS,
            });
        }

        let link = first_link(cells[0]).ok_or(RowError::MissingField("competition link"))?;
        let name = text_of(link);
        let link = href(link).to_string();
        let id = competition_id(&link).ok_or(RowError::MissingField("competition id"))?;
        let gender = text_of(cells[1]);

        let competition = match self.variant {
            CompetitionVariant::Domestic => {
                let country_links = links(cells[2]);
                let country = match country_links.last() {
                    Some(a) => text_of(*a),
                    None => text_of(cells[2]),
                };
                Competition {
                    id,
                    name,
                    link,
                    gender,
                    country: Some(country_or_raw(&country)),
                    governing_body: None,
                    tier: Some("1st".to_string()),
                    first_season: text_of(cells[3]),
                    last_season: text_of(cells[4]),
                    awards: parse_awards(cells.get(5).copied()),
                    variant: self.variant,
                }
            }
            CompetitionVariant::International | CompetitionVariant::National => Competition {
                id,
                name,
                link,
                gender,
                country: None,
                governing_body: Some(text_of(cells[2])),
                tier: Some(text_of(cells[5])),
                first_season: text_of(cells[3]),
                last_season: text_of(cells[4]),
                awards: parse_awards(cells.get(6).copied()),
                variant: self.variant,
            },
        };
        Ok(competition)
    }
}

impl DocumentParser for CompetitionListParser {
    type Output = Vec<Competition>;

    fn describe(&self) -> String {
        format!("{} competitions", self.variant)
    }

    fn parse(&self, doc: &Html) -> Result<Vec<Competition>, FatalError> {
        let table_id = self.variant.listing_table_id();
        let Some(table) = table_by_id(doc, table_id) else {
            warn!(table_id, "competition listing table not found");
            return Ok(Vec::new());
        };

        let mut competitions = Vec::new();
        for row in body_rows(table) {
            let cells = row_cells(row);
            if let Some(competition) = absorb_row(self.parse_row(&cells), table_id)? {
                competitions.push(competition);
            }
        }

        info!(variant = %self.variant, count = competitions.len(), "parsed competitions");
        Ok(competitions)
    }
}

/// Links in the awards cell with both a name and a target.
fn parse_awards(cell: Option<ElementRef<'_>>) -> Vec<Award> {
    let Some(cell) = cell else {
        return Vec::new();
    };
    links(cell)
        .into_iter()
        .filter_map(|a| {
            let award_name = text_of(a);
            let award_link = href(a).to_string();
            (!award_name.is_empty() && !award_link.is_empty()).then_some(Award {
                award_name,
                award_link,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
    <table id="comps_1_fa_club_league_senior">
      <thead><tr><th>Competition Name</th><th>Gender</th><th>Country</th><th>First Season</th><th>Last Season</th><th>Awards</th></tr></thead>
      <tbody>
        <tr>
          <th><a href="/en/comps/9/history/Premier-League-Seasons">Premier League</a></th>
          <td>M</td>
          <td><a href="/en/country/ENG/England-Football"><span>eng</span></a> <a href="/en/country/ENG/England-Football">ENG</a></td>
          <td>1888-1889</td><td>2025-2026</td>
          <td><a href="/en/awards/pl-potm">Player of the Month</a><a href="">Empty</a></td>
        </tr>
        <tr>
          <th><a href="/en/about/">Broken</a></th><td>M</td><td>X</td><td>1</td><td>2</td><td></td>
        </tr>
        <tr><th>Spacer</th><td>M</td></tr>
      </tbody>
    </table>
    <table id="comps_intl_fa_nonqualifier_senior">
      <tbody>
        <tr>
          <th><a href="/en/comps/1/history/World-Cup-Seasons">FIFA World Cup</a></th>
          <td>M</td><td>FIFA</td><td>1930</td><td>2026</td><td>1st</td>
          <td><a href="/en/awards/golden-ball">Golden Ball</a></td>
        </tr>
      </tbody>
    </table>"#;

    #[test]
    fn test_domestic_listing() {
        let doc = Html::parse_document(LISTING);
        let comps = CompetitionListParser::new(CompetitionVariant::Domestic)
            .parse(&doc)
            .unwrap();
        assert_eq!(comps.len(), 1);
        let pl = &comps[0];
        assert_eq!(pl.id, 9);
        assert_eq!(pl.name, "Premier League");
        assert_eq!(pl.country.as_deref(), Some("England"));
        assert_eq!(pl.governing_body, None);
        assert_eq!(pl.tier.as_deref(), Some("1st"));
        assert_eq!(pl.first_season, "1888-1889");
        assert_eq!(
            pl.awards,
            vec![Award {
                award_name: "Player of the Month".into(),
                award_link: "/en/awards/pl-potm".into()
            }]
        );
    }

    #[test]
    fn test_national_listing() {
        let doc = Html::parse_document(LISTING);
        let comps = CompetitionListParser::new(CompetitionVariant::National)
            .parse(&doc)
            .unwrap();
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].id, 1);
        assert_eq!(comps[0].governing_body.as_deref(), Some("FIFA"));
        assert_eq!(comps[0].country, None);
        assert_eq!(comps[0].tier.as_deref(), Some("1st"));
        assert_eq!(comps[0].awards.len(), 1);
    }

    #[test]
    fn test_missing_table_yields_empty() {
        let doc = Html::parse_document(LISTING);
        let comps = CompetitionListParser::new(CompetitionVariant::International)
            .parse(&doc)
            .unwrap();
        assert!(comps.is_empty());
    }
}
