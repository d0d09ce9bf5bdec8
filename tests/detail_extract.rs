// tests/detail_extract.rs
//
// Detail-page extraction against saved pages.
//
use chrono::NaiveDate;
use scraper::Html;

use opt_scrape::model::{Greeks, OptionIdentifier};
use opt_scrape::specs::detail::{self, DetailLayout, Field};
use opt_scrape::ScrapeError;

const STOCK: &str = include_str!("fixtures/detail_stock.html");
const INDEX: &str = include_str!("fixtures/detail_index.html");
const URL: &str = "https://www.avanza.se/optioner/om-optionen.html/1172530/eric2i72-50";

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 9, 14).unwrap()
}

fn eric() -> OptionIdentifier {
    OptionIdentifier::new("1172530", "ERIC2I72.50")
}

#[test]
fn stock_option_full_record() {
    let doc = Html::parse_document(STOCK);
    let rec = detail::extract(&doc, &eric(), URL, day());

    assert_eq!(rec.id, "1172530");
    assert_eq!(rec.name, "eric2i72-50");
    assert_eq!(rec.detail_url, URL);
    assert_eq!(rec.price, Some(3.45));
    assert_eq!(rec.strike_price, Some(72.5));
    assert_eq!(rec.strike_date.as_deref(), Some("2022-12-16"));
    assert_eq!(rec.underlying_last_price, Some(71.84));
    assert_eq!(rec.capture_date, day());
}

#[test]
fn greeks_come_from_dd_slots_0_2_3_4() {
    let doc = Html::parse_document(STOCK);
    let rec = detail::extract(&doc, &eric(), URL, day());

    let g = rec.greeks.expect("greeks block present");
    assert_eq!(g.iv_buy, Some(31.25));
    assert_eq!(g.delta, Some(-0.45));
    // theta goes through the general parser, which drops the sign
    assert_eq!(g.theta, Some(0.03));
    assert_eq!(g.vega, Some(0.12));

    // dd 1 (33,10) and dd 5 (9,40) are on the page but never read
    assert_eq!(g.iv, None);
    assert_eq!(g.iv_sell, None);
    assert_eq!(g.gamma, None);
    assert_eq!(g.rho, None);
}

#[test]
fn index_option_reads_second_list_item() {
    let doc = Html::parse_document(INDEX);
    let ident = OptionIdentifier::new("1180001", "OMXS302L1900");
    let ex = detail::extract_with_report(&doc, &ident, "u", &DetailLayout::default(), day());

    assert_eq!(ex.record.underlying_last_price, Some(1950.12));
    assert_eq!(ex.record.strike_price, Some(1900.0));
    assert!(ex.failures.is_empty(), "unexpected failures: {:?}", ex.failures);
}

#[test]
fn dashes_are_nulls_not_failures() {
    let doc = Html::parse_document(INDEX);
    let ident = OptionIdentifier::new("1180001", "OMXS302L1900");
    let ex = detail::extract_with_report(&doc, &ident, "u", &DetailLayout::default(), day());

    assert_eq!(ex.record.price, None);
    assert_eq!(ex.record.greeks, Some(Greeks::default()));
    assert!(ex.failed(Field::Price).is_none());
    assert!(ex.failed(Field::Delta).is_none());
}

#[test]
fn missing_sell_price_is_null_price() {
    let page = STOCK.replace("sellPrice", "askPrice");
    let doc = Html::parse_document(&page);
    let ex = detail::extract_with_report(&doc, &eric(), URL, &DetailLayout::default(), day());

    assert_eq!(ex.record.price, None);
    assert!(matches!(ex.failed(Field::Price), Some(ScrapeError::NotFound(_))));
    // everything else still read
    assert_eq!(ex.record.strike_price, Some(72.5));
    assert!(ex.record.greeks.is_some());
}

#[test]
fn missing_greeks_block_drops_greeks_only() {
    let page = STOCK.replace("derivative_greeks_data", "derivative_other");
    let doc = Html::parse_document(&page);
    let ex = detail::extract_with_report(&doc, &eric(), URL, &DetailLayout::default(), day());

    assert_eq!(ex.record.greeks, None);
    assert_eq!(ex.record.price, Some(3.45));
    assert!(ex.failures.iter().all(|(f, _)| !f.is_greek()));
}

#[test]
fn stock_name_on_index_page_reads_wrong_item() {
    // stock rule wants li[3]; on the index layout that item has no numeric price
    let doc = Html::parse_document(INDEX);
    let ex = detail::extract_with_report(&doc, &eric(), URL, &DetailLayout::default(), day());

    // li[3] holds a time, which the general parser reads as digits only
    assert_eq!(ex.record.underlying_last_price, Some(173000.0));
}

#[test]
fn unparsable_value_is_recorded_as_parse_failure() {
    let page = STOCK.replace("<span class=\"sellPrice\">3,45</span>", "<span class=\"sellPrice\">stängd</span>");
    let doc = Html::parse_document(&page);
    let ex = detail::extract_with_report(&doc, &eric(), URL, &DetailLayout::default(), day());

    assert_eq!(ex.record.price, None);
    assert!(matches!(ex.failed(Field::Price), Some(ScrapeError::Parse { .. })));
}
