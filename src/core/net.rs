// src/core/net.rs
//
// Page fetching. No retries, no caching: one GET, body or error.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use scraper::Html;
use tracing::{debug, info};

use crate::config::consts::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::ScrapeError;

/// Anything that can turn a URL into an HTML body.
///
/// `Sync` so the worker pool can share one source across threads.
pub trait PageSource: Sync {
    fn get(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Live HTTP source. Follows redirects; any non-2xx status is a fetch error.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(Policy::limited(10))
            .build()
            .map_err(|e| ScrapeError::fetch("<client>", e))?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn get(&self, url: &str) -> Result<String, ScrapeError> {
        info!("Requesting page {url}");
        let resp = self.client
            .get(url)
            .send()
            .map_err(|e| ScrapeError::fetch(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::fetch(url, format!("HTTP {status}")));
        }
        resp.text().map_err(|e| ScrapeError::fetch(url, e))
    }
}

/// Pages held in memory, keyed by exact URL. Replays captured pages offline.
#[derive(Default)]
pub struct MemorySource {
    pages: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.insert(url.into(), body.into());
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageSource for MemorySource {
    fn get(&self, url: &str) -> Result<String, ScrapeError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::fetch(url, "no such page"))
    }
}

/// Fetch and parse into a document tree.
pub fn fetch_document(source: &dyn PageSource, url: &str) -> Result<Html, ScrapeError> {
    let body = source.get(url)?;
    debug!("Received page ({} bytes), parsing HTML", body.len());
    Ok(Html::parse_document(&body))
}
