// benches/extract.rs
use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion, black_box};
use scraper::Html;

use opt_scrape::{
    model::OptionIdentifier,
    specs::{detail, listing},
    config::options::RowPolicy,
};

const DETAIL: &str = include_str!("../tests/fixtures/detail_stock.html");
const LISTING: &str = include_str!("../tests/fixtures/listing_eric.html");

fn bench_extract(c: &mut Criterion) {
    let ident = OptionIdentifier::new("1172530", "ERIC2I72.50");
    let date = NaiveDate::from_ymd_opt(2022, 9, 14).unwrap();
    let doc = Html::parse_document(DETAIL);

    c.bench_function("detail_parse_and_extract", |b| {
        b.iter(|| {
            let doc = Html::parse_document(black_box(DETAIL));
            black_box(detail::extract(&doc, &ident, "u", date))
        })
    });

    c.bench_function("detail_extract_only", |b| {
        b.iter(|| black_box(detail::extract(black_box(&doc), &ident, "u", date)))
    });

    let listing_doc = Html::parse_document(LISTING);
    c.bench_function("listing_identifiers", |b| {
        b.iter(|| {
            let ids = listing::list_option_identifiers(black_box(&listing_doc), RowPolicy::Lenient);
            black_box(ids.map(|v| v.len()).unwrap_or(0))
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
