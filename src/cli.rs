// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::{
    config::{
        consts::*,
        options::{OptionType, RowPolicy, ScrapeOptions},
    },
    core::net::HttpSource,
    error::ScrapeError,
    log,
    progress::ConsoleProgress,
    scrape,
};

/// Scrape option prices and Greeks into `<out-dir>/<YYYY-MM-DD>.csv`.
#[derive(Debug, Parser)]
#[command(name = "opt_scrape", version, about)]
pub struct Args {
    /// Instrument whose listing page seeds underlying discovery
    #[arg(long, default_value = DEFAULT_INSTRUMENT_ID)]
    pub instrument: String,

    /// Expiry month filter (YYYY-MM); repeat for several. Defaults to the built-in list
    #[arg(long = "end-date", value_name = "YYYY-MM")]
    pub end_dates: Vec<String>,

    #[arg(long = "type", value_enum, default_value_t = OptionType::Put)]
    pub option_type: OptionType,

    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Concurrent detail-page fetches
    #[arg(long, default_value_t = WORKERS)]
    pub workers: usize,

    /// Pause after each request, in milliseconds
    #[arg(long, default_value_t = REQUEST_PAUSE_MS)]
    pub pause_ms: u64,

    /// Fail a listing on the first row without id or name instead of skipping it
    #[arg(long)]
    pub strict_rows: bool,

    /// Print the underlying ids and exit
    #[arg(long)]
    pub list_underlyings: bool,
}

impl Args {
    pub fn to_options(&self) -> ScrapeOptions {
        let mut opts = ScrapeOptions {
            instrument_id: self.instrument.clone(),
            option_type: self.option_type,
            rows: if self.strict_rows { RowPolicy::Strict } else { RowPolicy::Lenient },
            out_dir: self.out_dir.clone(),
            workers: self.workers,
            pause: Duration::from_millis(self.pause_ms),
            ..ScrapeOptions::default()
        };
        if !self.end_dates.is_empty() {
            opts.end_dates = self.end_dates.clone();
        }
        opts
    }
}

pub fn run(args: Args) -> Result<(), ScrapeError> {
    log::init(&args.log_file, &args.log_level)?;

    let opts = args.to_options();
    let source = HttpSource::new()?;

    if args.list_underlyings {
        for id in scrape::collect_underlyings(&source, &opts)? {
            println!("{id}");
        }
        return Ok(());
    }

    let mut progress = ConsoleProgress::default();
    let summary = scrape::run(&source, &opts, scrape::today(), Some(&mut progress))?;
    println!(
        "Wrote {} rows from {} underlyings to {}",
        summary.records,
        summary.underlyings,
        summary.file.display()
    );
    if summary.failed_underlyings > 0 {
        eprintln!(
            "{} underlyings could not be listed, see {}",
            summary.failed_underlyings,
            args.log_file.display()
        );
    }
    Ok(())
}
