// src/file.rs
//
// Daily CSV sink: `<dir>/<YYYY-MM-DD>.csv`, header written once on creation,
// rows appended by every run that day.

use std::{
    fs::{self, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::consts::CSV_HEADER;
use crate::error::ScrapeError;
use crate::model::OptionRecord;

/// One CSV row. Field order is the header order.
#[derive(Serialize)]
struct Row<'a> {
    oid: &'a str,
    name: &'a str,
    price: Option<f64>,
    iv: Option<f64>,
    iv_buy: Option<f64>,
    iv_sell: Option<f64>,
    delta: Option<f64>,
    theta: Option<f64>,
    vega: Option<f64>,
    gamma: Option<f64>,
    rho: Option<f64>,
    url: &'a str,
    strike_price: Option<f64>,
    underlying_last_price: Option<f64>,
    strike_date: Option<&'a str>,
    scrape_date: String,
}

impl<'a> From<&'a OptionRecord> for Row<'a> {
    fn from(r: &'a OptionRecord) -> Self {
        let g = r.greeks.clone().unwrap_or_default();
        Row {
            oid: &r.id,
            name: &r.name,
            price: r.price,
            iv: g.iv,
            iv_buy: g.iv_buy,
            iv_sell: g.iv_sell,
            delta: g.delta,
            theta: g.theta,
            vega: g.vega,
            gamma: g.gamma,
            rho: g.rho,
            url: &r.detail_url,
            strike_price: r.strike_price,
            underlying_last_price: r.underlying_last_price,
            strike_date: r.strike_date.as_deref(),
            scrape_date: r.capture_date.format("%Y-%m-%d").to_string(),
        }
    }
}

pub fn daily_path(dir: &Path, date: NaiveDate) -> PathBuf {
    let stem = date.format("%Y-%m-%d").to_string();
    dir.join(join!(stem, ".csv"))
}

/// Path of today's file, creating it (with header) if this is the day's first run.
pub fn ensure_daily_file(dir: &Path, date: NaiveDate) -> Result<PathBuf, ScrapeError> {
    ensure_directory(dir)?;
    let path = daily_path(dir, date);
    info!("Checking if CSV file {} exists", path.display());

    // create_new: a concurrent run that got there first keeps its rows
    let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(path),
        Err(e) => return Err(e.into()),
    };

    warn!("CSV file {} does not exist, creating it", path.display());
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(CSV_HEADER)?;
    writer.flush()?;
    Ok(path)
}

/// Append one row per record. Never writes a header.
pub fn append_records(path: &Path, records: &[OptionRecord]) -> Result<usize, ScrapeError> {
    let file = OpenOptions::new().append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    for record in records {
        writer.serialize(Row::from(record))?;
    }
    writer.flush()?;

    debug!("Appended {} rows to {}", records.len(), path.display());
    Ok(records.len())
}

pub fn ensure_directory(dir: &Path) -> Result<(), ScrapeError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Greeks, OptionIdentifier};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 9, 14).unwrap()
    }

    #[test]
    fn daily_path_is_iso_date() {
        let p = daily_path(Path::new("data"), day());
        assert_eq!(p, Path::new("data").join("2022-09-14.csv"));
    }

    #[test]
    fn header_written_once_and_nulls_are_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = ensure_daily_file(tmp.path(), day()).unwrap();
        // second call must not truncate or re-write the header
        let again = ensure_daily_file(tmp.path(), day()).unwrap();
        assert_eq!(path, again);

        let mut rec = OptionRecord::minimal(&OptionIdentifier::new("42", "ABC.5"), "u/42/abc-5", day());
        rec.price = Some(1.5);
        rec.greeks = Some(Greeks { delta: Some(-0.25), ..Greeks::default() });
        rec.strike_date = Some(s!("2022-12-16"));
        append_records(&path, &[rec]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(lines[1], "42,abc-5,1.5,,,,-0.25,,,,,u/42/abc-5,,,2022-12-16,2022-09-14");
    }

    #[test]
    fn existing_rows_survive_racing_creators() {
        let tmp = tempfile::tempdir().unwrap();
        let path = ensure_daily_file(tmp.path(), day()).unwrap();
        let rec = OptionRecord::minimal(&OptionIdentifier::new("1", "A.5"), "u/1/a-5", day());
        append_records(&path, &[rec]).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| ensure_daily_file(tmp.path(), day()).unwrap());
            }
        });

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("1,a-5,"));
    }

    #[test]
    fn racing_first_runs_write_one_header() {
        let tmp = tempfile::tempdir().unwrap();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| ensure_daily_file(tmp.path(), day()).unwrap());
            }
        });
        let text = fs::read_to_string(daily_path(tmp.path(), day())).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![CSV_HEADER.join(",")]);
    }

    #[test]
    fn file_in_place_of_dir_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("data");
        fs::write(&blocker, "x").unwrap();
        assert!(ensure_daily_file(&blocker, day()).is_err());
    }
}
