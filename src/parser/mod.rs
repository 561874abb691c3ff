pub mod dom;
pub mod headers;
pub mod locate;
pub mod mapping;
pub mod record;

use once_cell::sync::Lazy;
use scraper::Selector;

pub use headers::HeaderMap;
pub use record::{ParsedRow, Scorers, SqlValue, TopScorer};

pub(crate) static LINK: Lazy<Selector> = Lazy::new(|| dom::selector("a"));
