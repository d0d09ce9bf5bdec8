// src/config/consts.rs

// Net config
pub const LISTING_BASE_URL: &str = "https://www.avanza.se/optioner-lista.html";
pub const DETAIL_BASE_URL: &str = "https://www.avanza.se/optioner/om-optionen.html/";
pub const USER_AGENT: &str = "opt_scrape/0.1";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Scrape
pub const DEFAULT_INSTRUMENT_ID: &str = "9270";
pub const DEFAULT_END_DATES: [&str; 10] = [
    "2022-09", "2022-10", "2022-11", "2022-12", "2023-01",
    "2023-02", "2023-03", "2023-04", "2023-05", "2023-06",
];

// Export
pub const DEFAULT_OUT_DIR: &str = "data";
pub const DEFAULT_LOG_FILE: &str = "main.log";
pub const DEFAULT_LOG_LEVEL: &str = "debug";
pub const CSV_HEADER: [&str; 16] = [
    "oid", "name", "price", "iv", "iv_buy", "iv_sell", "delta", "theta", "vega",
    "gamma", "rho", "url", "strike_price", "underlying_last_price", "strike_date", "scrape_date",
];

// Concurrency
pub const WORKERS: usize = 1;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
