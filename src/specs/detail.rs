// src/specs/detail.rs
//! Spec for a single option's detail page (`om-optionen.html/<id>/<slug>`).
//!
//! The page carries no semantic markup for the values we want; every field
//! sits at a fixed position inside a same-class collection. Those positions
//! live in [`DetailLayout`] so a redesign touches one table.
//!
//! Extraction is best-effort. A field that cannot be located or parsed is
//! logged and left `None`; the failure itself is kept in [`Extraction`].
//! `extract` always returns a record.

use std::fmt;

use chrono::NaiveDate;
use scraper::Html;
use tracing::{debug, error};

use crate::core::html::{nth_in, nth_in_doc, raw_text_of, text_of};
use crate::core::sanitize::{parse_digits_only, parse_iv, parse_number, parse_price, strip_nbsp};
use crate::error::ScrapeError;
use crate::model::{Greeks, OptionIdentifier, OptionRecord};

/// Name fragments marking an index underlying (OMXS30 family, OMX ESG).
pub const OMX_INDEX_SENTINEL: &str = "omxs";
pub const OMX_ESG_SENTINEL: &str = "omxesg";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Price,
    StrikePrice,
    StrikeDate,
    UnderlyingLastPrice,
    IvBuy,
    Delta,
    Theta,
    Vega,
}

impl Field {
    pub fn is_greek(&self) -> bool {
        matches!(self, Field::IvBuy | Field::Delta | Field::Theta | Field::Vega)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Price => "price",
            Field::StrikePrice => "strike_price",
            Field::StrikeDate => "strike_date",
            Field::UnderlyingLastPrice => "underlying_last_price",
            Field::IvBuy => "iv_buy",
            Field::Delta => "delta",
            Field::Theta => "theta",
            Field::Vega => "vega",
        };
        f.write_str(s)
    }
}

/// How a located text becomes a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalizer {
    /// `-` → none, otherwise signed decimal.
    Price,
    /// Keep `[0-9,]` only.
    Number,
    DigitsOnly,
    Iv,
    /// Keep the text as is, surrounding whitespace included.
    Text,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Normalizer {
    pub fn apply(&self, text: &str) -> Result<Option<Value>, ScrapeError> {
        let num = |r: Result<Option<f64>, ScrapeError>| r.map(|o| o.map(Value::Number));
        match self {
            Normalizer::Price => num(parse_price(text)),
            Normalizer::Number => num(parse_number(text)),
            Normalizer::DigitsOnly => parse_digits_only(text).map(|v| Some(Value::Number(v))),
            Normalizer::Iv => num(parse_iv(text)),
            Normalizer::Text => Ok(Some(Value::Text(s!(text)))),
        }
    }
}

/// `container[container_index] → item[item_index] → inner` → text → normalizer.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRule {
    pub field: Field,
    pub container: &'static str,
    pub container_index: usize,
    pub item: Option<(&'static str, usize)>,
    pub inner: Option<&'static str>,
    pub strip_nbsp: bool,
    pub normalizer: Normalizer,
}

impl FieldRule {
    fn new(field: Field, container: &'static str, container_index: usize, normalizer: Normalizer) -> Self {
        Self { field, container, container_index, item: None, inner: None, strip_nbsp: false, normalizer }
    }

    fn item(mut self, css: &'static str, idx: usize) -> Self {
        self.item = Some((css, idx));
        self
    }

    fn inner(mut self, css: &'static str) -> Self {
        self.inner = Some(css);
        self
    }

    fn nbsp(mut self) -> Self {
        self.strip_nbsp = true;
        self
    }

    /// Locate the rule's element and return its text. Numeric rules get the
    /// whitespace-collapsed text; `Normalizer::Text` gets it exactly as on the page.
    pub fn locate(&self, doc: &Html) -> Result<String, ScrapeError> {
        let mut el = nth_in_doc(doc, self.container, self.container_index)?;
        if let Some((css, idx)) = self.item {
            el = nth_in(el, css, idx)?;
        }
        if let Some(css) = self.inner {
            el = nth_in(el, css, 0)?;
        }
        let text = match self.normalizer {
            Normalizer::Text => raw_text_of(el),
            _ => text_of(el),
        };
        Ok(if self.strip_nbsp { strip_nbsp(&text) } else { text })
    }

    pub fn read(&self, doc: &Html) -> Result<Option<Value>, ScrapeError> {
        let text = self.locate(doc)?;
        self.normalizer.apply(&text)
    }
}

/// Underlying last price: the list item to read depends on the option's name.
#[derive(Clone, Debug, PartialEq)]
pub struct UnderlyingRule {
    pub list: &'static str,
    pub item: &'static str,
    pub inner: &'static str,
    pub index_item: usize,
    pub esg_index_item: usize,
    pub stock_item: usize,
}

impl UnderlyingRule {
    /// Position of the last-price `li` for an option named `name` (slug form).
    ///
    /// Both index branches currently land on the same item.
    pub fn item_index(&self, name: &str) -> usize {
        if name.contains(OMX_INDEX_SENTINEL) {
            debug!("Underlying of {name} is an OMX index, using item {}", self.index_item);
            self.index_item
        } else if name.contains(OMX_ESG_SENTINEL) {
            debug!("Underlying of {name} is an OMX ESG index, using item {}", self.esg_index_item);
            self.esg_index_item
        } else {
            self.stock_item
        }
    }

    pub fn read(&self, doc: &Html, name: &str) -> Result<Option<f64>, ScrapeError> {
        let list = nth_in_doc(doc, self.list, 0)?;
        let li = nth_in(list, self.item, self.item_index(name))?;
        let span = nth_in(li, self.inner, 0)?;
        parse_number(&text_of(span))
    }
}

/// Where every field sits on the detail page.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailLayout {
    pub fields: Vec<FieldRule>,
    pub underlying: UnderlyingRule,
    /// Present iff the page has a greeks block at all.
    pub greeks_container: &'static str,
}

const PRIMARY_INFO: &str = "ul.primaryInfo";
const GREEKS_LIST: &str = "div.derivative_greeks_data dl";

impl Default for DetailLayout {
    fn default() -> Self {
        use Field::*;
        use Normalizer as N;

        // dd 1 and everything past 4 are not read; iv, iv_sell, gamma and rho
        // have no slot in the current page.
        Self {
            fields: vec![
                FieldRule::new(Price, "span.sellPrice", 0, N::Price),
                FieldRule::new(StrikePrice, PRIMARY_INFO, 1, N::Number).item("span.data", 1).nbsp(),
                FieldRule::new(StrikeDate, PRIMARY_INFO, 0, N::Text).item("span.data", 2),
                FieldRule::new(IvBuy, GREEKS_LIST, 0, N::Iv).item("dd", 0).inner("span"),
                FieldRule::new(Delta, GREEKS_LIST, 0, N::Price).item("dd", 2).inner("span"),
                FieldRule::new(Theta, GREEKS_LIST, 0, N::Iv).item("dd", 3).inner("span"),
                FieldRule::new(Vega, GREEKS_LIST, 0, N::Iv).item("dd", 4).inner("span"),
            ],
            underlying: UnderlyingRule {
                list: "div.underlying_instrument ul.cleanList",
                item: "li",
                inner: "span.lastPrice span",
                index_item: 1,
                esg_index_item: 1,
                stock_item: 3,
            },
            greeks_container: "div.derivative_greeks_data",
        }
    }
}

/// A record plus the reason behind each field that came out `None` by failure
/// (as opposed to the page saying `-`).
#[derive(Debug)]
pub struct Extraction {
    pub record: OptionRecord,
    pub failures: Vec<(Field, ScrapeError)>,
    /// The layout itself was unusable; `record` is `OptionRecord::minimal`.
    pub identity_only: bool,
}

impl Extraction {
    pub fn failed(&self, field: Field) -> Option<&ScrapeError> {
        self.failures.iter().find(|(f, _)| *f == field).map(|(_, e)| e)
    }
}

pub fn detail_url(base: &str, ident: &OptionIdentifier) -> String {
    join!(base, &ident.id, "/", &ident.slug())
}

pub fn extract(doc: &Html, ident: &OptionIdentifier, detail_url: &str, capture_date: NaiveDate) -> OptionRecord {
    extract_with_report(doc, ident, detail_url, &DetailLayout::default(), capture_date).record
}

pub fn extract_with_report(
    doc: &Html,
    ident: &OptionIdentifier,
    detail_url: &str,
    layout: &DetailLayout,
    capture_date: NaiveDate,
) -> Extraction {
    match try_extract(doc, ident, detail_url, layout, capture_date) {
        Ok(extraction) => extraction,
        Err(e) => {
            error!("Could not build record for {}, keeping identity only: {e}", ident.id);
            Extraction {
                record: OptionRecord::minimal(ident, detail_url, capture_date),
                failures: vec![],
                identity_only: true,
            }
        }
    }
}

#[derive(Default)]
struct Collected {
    price: Option<f64>,
    strike_price: Option<f64>,
    strike_date: Option<String>,
    underlying_last_price: Option<f64>,
    greeks: Greeks,
}

/// Only a broken layout (invalid selector) is an `Err` here; page-level
/// problems are settled per field.
fn try_extract(
    doc: &Html,
    ident: &OptionIdentifier,
    detail_url: &str,
    layout: &DetailLayout,
    capture_date: NaiveDate,
) -> Result<Extraction, ScrapeError> {
    let name = ident.slug();
    debug!("Scraping data for option {name} at {detail_url}");

    let mut failures = Vec::new();
    let mut got = Collected::default();

    for rule in &layout.fields {
        let value = match rule.read(doc) {
            Err(e @ ScrapeError::Selector(_)) => return Err(e),
            other => settle(rule.field, other, &mut failures),
        };
        assign(&mut got, rule.field, value);
    }

    got.underlying_last_price = match layout.underlying.read(doc, &name) {
        Err(e @ ScrapeError::Selector(_)) => return Err(e),
        other => settle(Field::UnderlyingLastPrice, other, &mut failures).and_then(|v| match v {
            Value::Number(n) => Some(n),
            Value::Text(_) => None,
        }),
    };

    let has_greeks = nth_in_doc(doc, layout.greeks_container, 0).is_ok();
    if !has_greeks {
        error!("No greeks block on page for {name}");
        // Every greek rule failed on the missing container; `greeks: None` says it all.
        failures.retain(|(f, _)| !f.is_greek());
    }

    let record = OptionRecord {
        id: ident.id.clone(),
        name,
        price: got.price,
        greeks: has_greeks.then_some(got.greeks),
        detail_url: s!(detail_url),
        strike_price: got.strike_price,
        underlying_last_price: got.underlying_last_price,
        strike_date: got.strike_date,
        capture_date,
    };
    Ok(Extraction { record, failures, identity_only: false })
}

/// Collapse a field result to a value, logging and remembering failures.
fn settle<T: Into<Value>>(
    field: Field,
    result: Result<Option<T>, ScrapeError>,
    failures: &mut Vec<(Field, ScrapeError)>,
) -> Option<Value> {
    match result {
        Ok(Some(v)) => Some(v.into()),
        Ok(None) => {
            debug!("{field}: page shows no value");
            None
        }
        Err(e) => {
            error!("{field}: {e}");
            failures.push((field, e));
            None
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

fn assign(got: &mut Collected, field: Field, value: Option<Value>) {
    let number = |v: &Option<Value>| match v {
        Some(Value::Number(n)) => Some(*n),
        _ => None,
    };
    match field {
        Field::Price => got.price = number(&value),
        Field::StrikePrice => got.strike_price = number(&value),
        Field::StrikeDate => {
            got.strike_date = match value {
                Some(Value::Text(t)) => Some(t),
                Some(Value::Number(n)) => Some(n.to_string()),
                None => None,
            }
        }
        Field::UnderlyingLastPrice => got.underlying_last_price = number(&value),
        Field::IvBuy => got.greeks.iv_buy = number(&value),
        Field::Delta => got.greeks.delta = number(&value),
        Field::Theta => got.greeks.theta = number(&value),
        Field::Vega => got.greeks.vega = number(&value),
    }
}
