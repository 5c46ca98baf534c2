//! Per-variant rules deriving a line's amount from its editable fields.

use rust_decimal::Decimal;

use crate::models::LineData;

use super::measurement::{parse_feet_inches, parse_measurement};

/// Coerces user text to a decimal: trimmed, with empty or unparsable
/// input becoming zero. Totals must never be blocked by one malformed
/// field, so this mirrors the lenient parsers rather than erroring.
pub fn coerce_decimal(text: &str) -> Decimal {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    trimmed.parse().unwrap_or_else(|_| {
        tracing::debug!(input = %text, "unparsable numeric field coerced to zero");
        Decimal::ZERO
    })
}

/// Computes the amount a line's current fields imply.
///
/// - `SquareFootage` / `Measurement`: area of the measurement text.
/// - `ThreeField`: the stored amount itself; the user edits it directly.
/// - `SevenField`: quantity × price × length in feet, where an *empty*
///   length field counts as 1 foot. Only a present-but-unparsable length
///   degrades to 0. A line priced per-each must not zero out just because
///   no length was entered.
pub fn line_amount(data: &LineData) -> Decimal {
    match data {
        LineData::SquareFootage { measurement, .. }
        | LineData::Measurement { measurement, .. } => parse_measurement(measurement),
        LineData::ThreeField { amount, .. } => *amount,
        LineData::SevenField {
            quantity,
            price,
            description_three,
            ..
        } => {
            let length = if description_three.trim().is_empty() {
                Decimal::ONE
            } else {
                parse_feet_inches(description_three)
            };
            *quantity * *price * length
        }
    }
}
