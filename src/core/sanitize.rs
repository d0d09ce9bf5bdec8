// src/core/sanitize.rs
//
// Text → number coercions for the values shown on option pages.
// Numbers on the site use `,` as decimal separator and spaces/nbsp as
// thousands separator; a lone `-` means "no value".

use crate::error::ScrapeError;

const NO_VALUE: &str = "-";

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Drop non-breaking spaces, both decoded and as a leftover `&nbsp;` entity.
pub fn strip_nbsp(s: &str) -> String {
    s.replace("&nbsp;", "").replace('\u{a0}', "")
}

/// Path segment for the detail page: lower-case, `.` → `-`
/// (decimal strikes are written `abc-50` in the site's URLs).
pub fn url_slug(display_name: &str) -> String {
    display_name.to_lowercase().replace('.', "-")
}

/// General parser: keep `[0-9,]`, read `,` as the decimal point.
///
/// Signs and any other noise are discarded, so `"-0,12"` reads as `0.12`.
pub fn parse_number(text: &str) -> Result<Option<f64>, ScrapeError> {
    let t = text.trim();
    if t == NO_VALUE {
        return Ok(None);
    }
    let kept: String = t
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    kept.parse::<f64>()
        .map(Some)
        .map_err(|_| ScrapeError::parse("number", text))
}

/// Digits only. The decimal separator is thrown away with everything else,
/// so `"215,50 kr"` reads as `21550.0`.
pub fn parse_digits_only(text: &str) -> Result<f64, ScrapeError> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<f64>()
        .map_err(|_| ScrapeError::parse("digits", text))
}

pub fn parse_iv(text: &str) -> Result<Option<f64>, ScrapeError> {
    if text.trim() == NO_VALUE {
        return Ok(None);
    }
    parse_number(text)
}

/// Price variant: keeps the sign, only whitespace is tolerated as noise.
pub fn parse_price(text: &str) -> Result<Option<f64>, ScrapeError> {
    let t = text.trim();
    if t == NO_VALUE {
        return Ok(None);
    }
    let cleaned: String = t
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>()
        .map(Some)
        .map_err(|_| ScrapeError::parse("price", text))
}
