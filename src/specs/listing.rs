// src/specs/listing.rs
//! Spec for the options listing page (`optioner-lista.html`).
//!
//! - Underlyings: `<select id="underlyingInstrumentId">`, one `<option value=…>` each.
//! - Options: `#contentTable tbody > tr[data-oid]`, name in `a.link[title]`.

use reqwest::Url;
use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use crate::config::options::{OptionType, RowPolicy};
use crate::core::html::{nth_in_doc, selector};
use crate::error::ScrapeError;
use crate::model::OptionIdentifier;

const UNDERLYING_SELECT: &str = "#underlyingInstrumentId";
const OPTIONS_TABLE: &str = "#contentTable tbody";
const ID_ATTR: &str = "data-oid";
const NAME_LINK: &str = "a.link";

/// Listing query for one underlying, filtered by type and expiry months.
pub fn listing_url(
    base: &str,
    underlying_id: &str,
    option_type: OptionType,
    end_dates: &[String],
) -> Result<String, ScrapeError> {
    let mut params: Vec<(&str, &str)> = vec![
        ("name", ""),
        ("underlyingInstrumentId", underlying_id),
        ("callIndicators", option_type.as_param()),
    ];
    params.extend(end_dates.iter().map(|d| ("selectedEndDates", d.as_str())));
    params.extend([
        ("sortField", "NAME"),
        ("sortOrder", "ASCENDING"),
        ("activeTab", "overview"),
    ]);

    debug!("End date filters: {end_dates:?}");
    let url = Url::parse_with_params(base, &params).map_err(|e| ScrapeError::fetch(base, e))?;
    Ok(url.into())
}

/// Every underlying instrument id offered by the listing's select control.
pub fn list_underlyings(doc: &Html) -> Result<Vec<String>, ScrapeError> {
    info!("Scraping page for all available underlyings");
    let control = nth_in_doc(doc, UNDERLYING_SELECT, 0)?;
    let option_sel = selector("option")?;

    let mut ids = Vec::new();
    for (i, opt) in control.select(&option_sel).enumerate() {
        match opt.value().attr("value") {
            Some(v) => ids.push(s!(v)),
            None => warn!("Underlying option {i} has no value attribute, skipping"),
        }
    }

    info!("Found {} underlyings", ids.len());
    Ok(ids)
}

/// The listing's results table body.
pub fn options_table(doc: &Html) -> Result<ElementRef<'_>, ScrapeError> {
    debug!("Finding tbody containing list of options");
    nth_in_doc(doc, OPTIONS_TABLE, 0)
}

/// `(id, display name)` for each row of the results table.
pub fn list_option_identifiers(
    doc: &Html,
    policy: RowPolicy,
) -> Result<Vec<OptionIdentifier>, ScrapeError> {
    let tbody = options_table(doc)?;
    let tr_sel = selector("tr")?;
    let link_sel = selector(NAME_LINK)?;

    let mut out = Vec::new();
    for (row, tr) in tbody.select(&tr_sel).enumerate() {
        let id = tr.value().attr(ID_ATTR);
        let name = tr
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("title"));

        match (id, name) {
            (Some(id), Some(name)) => out.push(OptionIdentifier::new(id, name)),
            (id, _) => {
                let missing = if id.is_none() { ID_ATTR } else { "a.link[title]" };
                let err = ScrapeError::MalformedRow { row, missing };
                match policy {
                    RowPolicy::Strict => return Err(err),
                    RowPolicy::Lenient => warn!("{err}, skipping"),
                }
            }
        }
    }

    info!("Found {} options", out.len());
    Ok(out)
}
