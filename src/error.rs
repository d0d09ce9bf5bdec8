// src/error.rs
use thiserror::Error;

/// Everything that can go wrong between a URL and a CSV row.
///
/// Extraction code does not let these escape a record: the detail extractor
/// logs them and turns the field into `None`. Only the driver's setup steps
/// (first listing page, output file) hand them to the caller.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network/transport failure or a non-success HTTP status.
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// An HTML landmark the page layout promises is missing.
    #[error("landmark not found: {0}")]
    NotFound(String),

    /// Text that should have been a number was not.
    #[error("could not parse {what} from {text:?}")]
    Parse { what: &'static str, text: String },

    /// Listing row without its option id or display name.
    #[error("malformed listing row {row}: missing {missing}")]
    MalformedRow { row: usize, missing: &'static str },

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("logger setup failed: {0}")]
    Log(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    pub fn fetch(url: &str, reason: impl ToString) -> Self {
        ScrapeError::Fetch { url: s!(url), reason: reason.to_string() }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ScrapeError::NotFound(what.into())
    }

    pub fn parse(what: &'static str, text: &str) -> Self {
        ScrapeError::Parse { what, text: s!(text) }
    }
}
