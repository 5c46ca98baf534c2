//! Parsers for the free-text measurement fields.
//!
//! Both parsers are deliberately lenient: callers always need a numeric
//! result for display, so malformed input degrades to zero instead of
//! raising an error. Display formatting (decimal places, separators) is a
//! presentation concern and does not happen here.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static DIMENSION_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)x").expect("dimension separator regex"));

fn parse_part(part: &str) -> Option<Decimal> {
    part.trim().parse::<Decimal>().ok()
}

/// Parses a dimension string like `"60 x 114"` into its area.
///
/// The input is split on a case-insensitive `x`; both sides are trimmed
/// and parsed as decimals, and the result is their product. Anything that
/// does not yield two parseable parts returns zero. Segments past the
/// second are ignored.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use bid_core::calculations::parse_measurement;
///
/// assert_eq!(parse_measurement("60 x 114"), dec!(6840));
/// assert_eq!(parse_measurement("60X114"), dec!(6840));
/// assert_eq!(parse_measurement("abc"), dec!(0));
/// ```
pub fn parse_measurement(text: &str) -> Decimal {
    let mut parts = DIMENSION_SEPARATOR.split(text);
    let width = parts.next().and_then(parse_part);
    let height = parts.next().and_then(parse_part);
    match (width, height) {
        (Some(w), Some(h)) => w * h,
        _ => Decimal::ZERO,
    }
}

/// Parses a length string of the form `"feet-inches"` into decimal feet.
///
/// Splits on `-`; the first segment is whole feet, the second inches.
/// Either segment defaults to zero when missing or unparsable.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use bid_core::calculations::parse_feet_inches;
///
/// assert_eq!(parse_feet_inches("11-0"), dec!(11));
/// assert_eq!(parse_feet_inches("5-6"), dec!(5.5));
/// assert_eq!(parse_feet_inches(""), dec!(0));
/// ```
pub fn parse_feet_inches(text: &str) -> Decimal {
    let mut parts = text.splitn(2, '-');
    let feet = parts.next().and_then(parse_part).unwrap_or(Decimal::ZERO);
    let inches = parts.next().and_then(parse_part).unwrap_or(Decimal::ZERO);
    feet + inches / Decimal::from(12)
}
