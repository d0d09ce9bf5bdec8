// src/specs/mod.rs
//! # Page specs
//!
//! Each spec knows *where the ground truth lives* on one kind of page and how to
//! read it: the options listing (`listing`) and a single option's detail page
//! (`detail`).
//!
//! ## What lives here
//! - **Pure HTML reading** over an already parsed `scraper::Html`.
//! - **URL construction** for the page the spec reads.
//! - **Selector choice and positions**, kept in one place per page.
//!
//! ## What does **not** live here
//! - Fetching (`core::net`), persistence (`file`), or deciding what to scrape
//!   next (`scrape`).
//!
//! ## Typical call chain
//! ```text
//! cli → scrape::run → core::net::fetch_document
//!                   → specs::listing::{list_underlyings, list_option_identifiers}
//!                   → specs::detail::extract
//!                   → file::append_records
//! ```
//!
//! Specs are testable offline against saved pages (see `tests/fixtures`).
pub mod detail;
pub mod listing;
