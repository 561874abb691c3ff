use thiserror::Error;
use tracing::debug;

/// Conditions that must stop the whole pipeline run.
///
/// Document parsers return `Result<_, FatalError>`, so this is the only error
/// kind that can escape a parse. Everything else is absorbed at the row.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FatalError {
    #[error("nationality code '{code}' is not in the country mapping")]
    UnmappedNationality { code: String },
}

/// Failure to extract a single row. Skippable unless it wraps a [`FatalError`].
#[derive(Debug, Error)]
pub enum RowError {
    #[error("row has {found} cells, need at least {needed}")]
    TooFewCells { found: usize, needed: usize },

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("column '{0}' not present in header mapping")]
    MissingColumn(&'static str),

    #[error("could not parse '{value}' as a number for '{field}'")]
    InvalidNumber { field: String, value: String },

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

pub type RowResult<T> = std::result::Result<T, RowError>;

/// Turn a row result into "keep / skip", logging skips and re-raising fatal errors.
pub fn absorb_row<T>(result: RowResult<T>, context: &str) -> Result<Option<T>, FatalError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(RowError::Fatal(fatal)) => Err(fatal),
        Err(err) => {
            debug!(context, error = %err, "skipping row");
            Ok(None)
        }
    }
}

/// True when an `anyhow` chain carries a pipeline-stopping error.
pub fn is_fatal(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.downcast_ref::<FatalError>().is_some())
}
