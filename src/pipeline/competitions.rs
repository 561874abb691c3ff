use anyhow::{bail, Context, Result};
use scraper::Html;
use tracing::info;

use super::{Pipeline, RunSummary};
use crate::documents::{CompetitionListParser, DocumentParser};
use crate::download::DocumentSource;
use crate::model::CompetitionVariant;

impl<S: DocumentSource> Pipeline<'_, S> {
    /// Scrape the competitions index once and replace each listing.
    pub fn competitions(&mut self) -> Result<RunSummary> {
        let url = self.settings.competitions_url()?;
        let Some(doc) = self.source.get_document(&url, true) else {
            bail!("Competitions index {url} is unavailable");
        };

        let mut summary = RunSummary::default();
        for variant in CompetitionVariant::ALL {
            let result = self.store_listing(&doc, variant);
            summary.absorb(result, variant.as_str())?;
        }

        info!(%summary, "competitions done");
        Ok(summary)
    }

    fn store_listing(&mut self, doc: &Html, variant: CompetitionVariant) -> Result<usize> {
        let parser = CompetitionListParser::new(variant);
        let competitions = parser
            .parse(doc)
            .with_context(|| format!("Failed to parse {}", parser.describe()))?;
        // An empty listing leaves the stored one in place
        if competitions.is_empty() {
            bail!("No {variant} competitions found");
        }
        self.store.replace_competitions(variant, &competitions)
    }
}
