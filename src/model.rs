// src/model.rs
use chrono::NaiveDate;

use crate::core::sanitize::url_slug;

/// One row of a listing table: the site's option id and its display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionIdentifier {
    pub id: String,
    pub display_name: String,
}

impl OptionIdentifier {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { id: id.into(), display_name: display_name.into() }
    }

    /// Lower-cased, `.` → `-`. Used both in the detail URL and as the record name.
    pub fn slug(&self) -> String {
        url_slug(&self.display_name)
    }
}

/// Sensitivities as shown on the detail page.
///
/// Only `iv_buy`, `delta`, `theta` and `vega` are ever filled: the page has
/// no readable slot for the others.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Greeks {
    pub iv: Option<f64>,
    pub iv_buy: Option<f64>,
    pub iv_sell: Option<f64>,
    pub delta: Option<f64>,
    pub theta: Option<f64>,
    pub vega: Option<f64>,
    pub gamma: Option<f64>,
    pub rho: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OptionRecord {
    pub id: String,
    pub name: String,
    pub price: Option<f64>,
    pub greeks: Option<Greeks>,
    pub detail_url: String,
    pub strike_price: Option<f64>,
    pub underlying_last_price: Option<f64>,
    pub strike_date: Option<String>,
    pub capture_date: NaiveDate,
}

impl OptionRecord {
    /// Fallback when nothing beyond the identity could be read.
    pub fn minimal(ident: &OptionIdentifier, detail_url: &str, capture_date: NaiveDate) -> Self {
        Self {
            id: ident.id.clone(),
            name: ident.slug(),
            price: None,
            greeks: None,
            detail_url: s!(detail_url),
            strike_price: None,
            underlying_last_price: None,
            strike_date: None,
            capture_date,
        }
    }

    pub fn is_minimal(&self) -> bool {
        self.price.is_none()
            && self.greeks.is_none()
            && self.strike_price.is_none()
            && self.underlying_last_price.is_none()
            && self.strike_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_record_keeps_identity_only() {
        let ident = OptionIdentifier::new("123", "ABC.50");
        let date = NaiveDate::from_ymd_opt(2022, 9, 1).unwrap();
        let r = OptionRecord::minimal(&ident, "https://x/123/abc-50", date);
        assert_eq!(r.id, "123");
        assert_eq!(r.name, "abc-50");
        assert_eq!(r.detail_url, "https://x/123/abc-50");
        assert!(r.is_minimal());
    }
}
