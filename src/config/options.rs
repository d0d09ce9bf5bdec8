// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;
use crate::specs::detail::DetailLayout;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OptionType {
    #[default]
    Put,
    Call,
}

impl OptionType {
    /// Value of the listing page's `callIndicators` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self { OptionType::Put => "PUT", OptionType::Call => "CALL" }
    }
}

/// What to do with a listing row that lacks an option id or a display name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Fail the whole listing on the first bad row.
    Strict,
    /// Log and skip the row. No record is produced for it, not even one with
    /// empty fields: without an id there is no detail page to point at.
    #[default]
    Lenient,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrapeOptions {
    /// Instrument whose listing page seeds the underlying discovery.
    pub instrument_id: String,
    pub end_dates: Vec<String>,
    pub option_type: OptionType,
    pub rows: RowPolicy,
    pub out_dir: PathBuf,
    pub workers: usize,
    pub pause: Duration,
    pub listing_base_url: String,
    pub detail_base_url: String,
    /// Where each detail-page field lives.
    pub layout: DetailLayout,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            instrument_id: s!(DEFAULT_INSTRUMENT_ID),
            end_dates: DEFAULT_END_DATES.iter().map(|d| s!(*d)).collect(),
            option_type: OptionType::default(),
            rows: RowPolicy::default(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            workers: WORKERS,
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
            listing_base_url: s!(LISTING_BASE_URL),
            detail_base_url: s!(DETAIL_BASE_URL),
            layout: DetailLayout::default(),
        }
    }
}

impl ScrapeOptions {
    /// Worker count clamped to `1..=jobs`.
    pub fn effective_workers(&self, jobs: usize) -> usize {
        self.workers.min(jobs).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site_constants() {
        let o = ScrapeOptions::default();
        assert_eq!(o.instrument_id, "9270");
        assert_eq!(o.end_dates.len(), 10);
        assert_eq!(o.end_dates.first().map(String::as_str), Some("2022-09"));
        assert_eq!(o.option_type.as_param(), "PUT");
        assert_eq!(o.rows, RowPolicy::Lenient);
        assert_eq!(o.workers, 1);
    }

    #[test]
    fn effective_workers_is_clamped() {
        let mut o = ScrapeOptions::default();
        o.workers = 8;
        assert_eq!(o.effective_workers(3), 3);
        assert_eq!(o.effective_workers(0), 1);
        o.workers = 0;
        assert_eq!(o.effective_workers(10), 1);
    }
}
