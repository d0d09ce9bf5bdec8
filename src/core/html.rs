// src/core/html.rs
//
// Thin helpers over `scraper`: compile a selector with our error type,
// pick the n-th match, read visible text.

use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;
use super::sanitize::normalize_ws;

pub fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{css}: {e:?}")))
}

/// The `idx`-th element in document order matching `css`.
pub fn nth_in_doc<'a>(doc: &'a Html, css: &str, idx: usize) -> Result<ElementRef<'a>, ScrapeError> {
    let sel = selector(css)?;
    doc.select(&sel)
        .nth(idx)
        .ok_or_else(|| ScrapeError::not_found(format!("{css}[{idx}]")))
}

/// The `idx`-th descendant of `el` matching `css`.
pub fn nth_in<'a>(el: ElementRef<'a>, css: &str, idx: usize) -> Result<ElementRef<'a>, ScrapeError> {
    let sel = selector(css)?;
    el.select(&sel)
        .nth(idx)
        .ok_or_else(|| ScrapeError::not_found(format!("{css}[{idx}]")))
}

/// Visible text with whitespace runs collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Text nodes concatenated, untouched.
pub fn raw_text_of(el: ElementRef<'_>) -> String {
    el.text().collect()
}
