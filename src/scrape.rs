// src/scrape.rs
use std::{
    path::PathBuf,
    sync::{atomic::{AtomicUsize, Ordering}, mpsc},
    thread,
    time::Duration,
};

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::{
    config::{consts::JITTER_MS, options::ScrapeOptions},
    core::net::{fetch_document, PageSource},
    error::ScrapeError,
    file::{append_records, ensure_daily_file},
    model::{OptionIdentifier, OptionRecord},
    progress::Progress,
    specs::{detail, listing},
};

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub file: PathBuf,
    pub underlyings: usize,
    pub failed_underlyings: usize,
    pub records: usize,
}

enum Scraped {
    Full(OptionRecord),
    /// Detail page unreachable or unreadable; identity only.
    Minimal(OptionRecord),
}

impl Scraped {
    fn into_record(self) -> OptionRecord {
        match self { Scraped::Full(r) | Scraped::Minimal(r) => r }
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Underlying ids offered on the seed instrument's listing page.
pub fn collect_underlyings(
    source: &dyn PageSource,
    opts: &ScrapeOptions,
) -> Result<Vec<String>, ScrapeError> {
    let url = listing::listing_url(
        &opts.listing_base_url, &opts.instrument_id, opts.option_type, &opts.end_dates,
    )?;
    let doc = fetch_document(source, &url)?;
    listing::list_underlyings(&doc)
}

/// Options listed for one underlying.
pub fn collect_identifiers(
    source: &dyn PageSource,
    opts: &ScrapeOptions,
    underlying: &str,
) -> Result<Vec<OptionIdentifier>, ScrapeError> {
    let url = listing::listing_url(
        &opts.listing_base_url, underlying, opts.option_type, &opts.end_dates,
    )?;
    let doc = fetch_document(source, &url)?;
    listing::list_option_identifiers(&doc, opts.rows)
}

fn scrape_one(
    source: &dyn PageSource,
    opts: &ScrapeOptions,
    ident: &OptionIdentifier,
    date: NaiveDate,
) -> Scraped {
    let url = detail::detail_url(&opts.detail_base_url, ident);
    match fetch_document(source, &url) {
        Ok(doc) => {
            let ex = detail::extract_with_report(&doc, ident, &url, &opts.layout, date);
            if ex.identity_only {
                Scraped::Minimal(ex.record)
            } else {
                Scraped::Full(ex.record)
            }
        }
        Err(e) => {
            error!("Could not fetch option {} ({}): {e}", ident.id, ident.display_name);
            Scraped::Minimal(OptionRecord::minimal(ident, &url, date))
        }
    }
}

fn pause(base: Duration, i: usize) {
    if base.is_zero() {
        return;
    }
    let jitter = (i as u64) % JITTER_MS;
    thread::sleep(base + Duration::from_millis(jitter)); // be polite
}

fn report(progress: &mut Option<&mut (dyn Progress + '_)>, ident: &OptionIdentifier, scraped: &Scraped) {
    if let Some(p) = progress.as_deref_mut() {
        match scraped {
            Scraped::Full(_) => p.item_done(ident),
            Scraped::Minimal(_) => p.item_failed(ident),
        }
    }
}

/// One record per identifier, in listing order. Never fails: an unreachable
/// detail page yields a minimal record.
///
/// With `opts.workers > 1` detail pages are fetched by a bounded pool of
/// scoped threads; results come back to this thread over a channel.
pub fn collect_records(
    source: &dyn PageSource,
    opts: &ScrapeOptions,
    idents: &[OptionIdentifier],
    date: NaiveDate,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Vec<OptionRecord> {
    let total = idents.len();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(total);
    }
    debug!("Looping through {total} option ids");

    let mut slots: Vec<Option<OptionRecord>> = vec![None; total];
    let workers = opts.effective_workers(total);

    if workers == 1 {
        for (i, ident) in idents.iter().enumerate() {
            let scraped = scrape_one(source, opts, ident, date);
            report(&mut progress, ident, &scraped);
            slots[i] = Some(scraped.into_record());
            debug!("Progress: {}/{total}", i + 1);
            if i + 1 < total {
                pause(opts.pause, i);
            }
        }
    } else {
        let cursor = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, Scraped)>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let cursor = &cursor;
                scope.spawn(move || loop {
                    let i = cursor.fetch_add(1, Ordering::Relaxed);
                    if i >= total {
                        break;
                    }
                    let scraped = scrape_one(source, opts, &idents[i], date);
                    if tx.send((i, scraped)).is_err() {
                        break;
                    }
                    pause(opts.pause, i);
                });
            }
            drop(tx); // this thread is sole receiver now

            for (done, (i, scraped)) in rx.into_iter().enumerate() {
                report(&mut progress, &idents[i], &scraped);
                slots[i] = Some(scraped.into_record());
                debug!("Progress: {}/{total}", done + 1);
            }
        });
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    slots.into_iter().flatten().collect()
}

/// Full pipeline: discover underlyings, scrape each one's options, append
/// them to the day's CSV file.
///
/// Fails only if the seed listing cannot be read (no file is touched then) or
/// the output file cannot be opened. A broken underlying is logged and
/// skipped. Every call appends: two runs on the same day leave two sets of
/// rows.
pub fn run(
    source: &dyn PageSource,
    opts: &ScrapeOptions,
    date: NaiveDate,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, ScrapeError> {
    let underlyings = collect_underlyings(source, opts)?;
    let file = ensure_daily_file(&opts.out_dir, date)?;

    let mut summary = RunSummary {
        file: file.clone(),
        underlyings: underlyings.len(),
        failed_underlyings: 0,
        records: 0,
    };

    for underlying in &underlyings {
        info!("Collecting option info for underlying id {underlying}");
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("Underlying {underlying}"));
        }

        let idents = match collect_identifiers(source, opts, underlying) {
            Ok(v) => v,
            Err(e) => {
                error!("Skipping underlying {underlying}: {e}");
                summary.failed_underlyings += 1;
                continue;
            }
        };

        let records = collect_records(source, opts, &idents, date, progress.as_deref_mut());
        summary.records += append_records(&file, &records)?;
    }

    info!("Done: {} records from {} underlyings", summary.records, summary.underlyings);
    Ok(summary)
}
