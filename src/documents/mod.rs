//! One parser per page kind.
//!
//! Each parser locates its table(s), normalizes headers and walks the rows.
//! Row failures are skipped; only [`FatalError`] escapes a parse.

pub mod competition;
pub mod fixture;
pub mod match_report;
pub mod season;
pub mod standings;

use scraper::Html;

use crate::error::FatalError;

pub use competition::CompetitionListParser;
pub use fixture::{FixtureMode, FixtureParser};
pub use match_report::MatchReportParser;
pub use season::SeasonListParser;
pub use standings::StandingsParser;

/// Shared extraction contract for every page kind.
pub trait DocumentParser {
    type Output;

    /// Short label used in log lines.
    fn describe(&self) -> String;

    fn parse(&self, doc: &Html) -> Result<Self::Output, FatalError>;
}
