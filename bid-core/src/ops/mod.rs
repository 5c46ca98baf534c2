//! The estimate mutation API.
//!
//! Every operation takes the current estimate by `&mut`, validates its
//! targets before touching anything, applies the change, and finishes by
//! refreshing the derived totals (line amount, then section total, then
//! grand total). On error the estimate is untouched; there is no partial
//! mutation for a caller to observe.
//!
//! Operations against a deleted estimate always fail: deletion is the
//! terminal state of a calculator document.

use thiserror::Error;
use tracing::warn;

use crate::calculations::pricing::{coerce_decimal, line_amount};
use crate::calculations::totals::{grand_total, refresh_section};
use crate::db::repository::ProductLookup;
use crate::models::{CalculatorVariant, Estimate, Line, Section};

/// How many lines the bulk add/delete operations work on.
pub const BULK_LINE_COUNT: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimateOpError {
    /// The estimate has already been deleted; no operation is valid
    /// against it anymore.
    #[error("estimate '{0}' has been deleted")]
    EstimateDeleted(String),

    #[error("section '{0}' not found")]
    SectionNotFound(String),

    #[error("line '{line_id}' not found in section '{section_id}'")]
    LineNotFound { section_id: String, line_id: String },

    /// The edit names a field the estimate's variant does not define.
    #[error("field '{field}' is not defined for {variant} lines")]
    InvalidField {
        variant: CalculatorVariant,
        field: &'static str,
    },
}

impl EstimateOpError {
    /// Whether this is the not-found class (deleted estimate, missing
    /// section, missing line) as opposed to an invalid-field rejection.
    pub fn is_not_found(&self) -> bool {
        !matches!(self, Self::InvalidField { .. })
    }
}

/// One field edit against a line. Which edits are accepted depends on the
/// estimate's variant; the pairing is checked exhaustively in
/// [`update_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Dimension text, e.g. `"60 x 114"` (SquareFootage, Measurement).
    Measurement(String),
    /// Free-form description (SquareFootage, ThreeField, Measurement —
    /// on SevenField the description comes from the product lookup and
    /// is not directly editable).
    Description(String),
    /// Secondary note (ThreeField, SevenField).
    DescriptionTwo(String),
    /// Length as `"feet-inches"` (SevenField).
    DescriptionThree(String),
    /// Quantity text, numerically coerced (SevenField).
    Quantity(String),
    /// Unit price text, numerically coerced (SevenField).
    Price(String),
    /// Product code; triggers a catalog lookup (SevenField).
    ProductCode(String),
    /// Directly entered amount, numerically coerced (ThreeField).
    Amount(String),
}

impl FieldEdit {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Measurement(_) => "measurement",
            Self::Description(_) => "description",
            Self::DescriptionTwo(_) => "descriptionTwo",
            Self::DescriptionThree(_) => "descriptionThree",
            Self::Quantity(_) => "quantity",
            Self::Price(_) => "price",
            Self::ProductCode(_) => "productCode",
            Self::Amount(_) => "amount",
        }
    }
}

fn ensure_active(estimate: &Estimate) -> Result<(), EstimateOpError> {
    if estimate.deleted {
        return Err(EstimateOpError::EstimateDeleted(estimate.id.clone()));
    }
    Ok(())
}

/// Appends a new section holding one default blank line. The new section
/// totals zero, so the grand total is unchanged.
pub fn add_section(estimate: &mut Estimate) -> Result<String, EstimateOpError> {
    ensure_active(estimate)?;
    let section = Section::new(estimate.variant);
    let id = section.id.clone();
    estimate.sections.push(section);
    estimate.grand_total = grand_total(estimate);
    Ok(id)
}

/// Removes a section and every line in it, then recomputes the grand
/// total.
pub fn delete_section(estimate: &mut Estimate, section_id: &str) -> Result<(), EstimateOpError> {
    ensure_active(estimate)?;
    let index = estimate
        .sections
        .iter()
        .position(|s| s.id == section_id)
        .ok_or_else(|| EstimateOpError::SectionNotFound(section_id.to_string()))?;
    estimate.sections.remove(index);
    estimate.grand_total = grand_total(estimate);
    Ok(())
}

/// Sets a section's title. An empty (after trim) title is rejected as a
/// no-op so a section never loses its name to a blank submit.
pub fn rename_section(
    estimate: &mut Estimate,
    section_id: &str,
    new_title: &str,
) -> Result<(), EstimateOpError> {
    ensure_active(estimate)?;
    let section = estimate
        .section_mut(section_id)
        .ok_or_else(|| EstimateOpError::SectionNotFound(section_id.to_string()))?;
    if new_title.trim().is_empty() {
        return Ok(());
    }
    section.title = new_title.to_string();
    Ok(())
}

/// Appends one default line to the named section.
pub fn add_line(estimate: &mut Estimate, section_id: &str) -> Result<String, EstimateOpError> {
    ensure_active(estimate)?;
    let variant = estimate.variant;
    let section = estimate
        .section_mut(section_id)
        .ok_or_else(|| EstimateOpError::SectionNotFound(section_id.to_string()))?;
    let line = Line::new(variant);
    let id = line.id.clone();
    section.lines.push(line);
    refresh_section(section);
    estimate.grand_total = grand_total(estimate);
    Ok(id)
}

/// Appends [`BULK_LINE_COUNT`] default lines to the named section.
pub fn add_ten_lines(
    estimate: &mut Estimate,
    section_id: &str,
) -> Result<Vec<String>, EstimateOpError> {
    ensure_active(estimate)?;
    let variant = estimate.variant;
    let section = estimate
        .section_mut(section_id)
        .ok_or_else(|| EstimateOpError::SectionNotFound(section_id.to_string()))?;
    let mut ids = Vec::with_capacity(BULK_LINE_COUNT);
    for _ in 0..BULK_LINE_COUNT {
        let line = Line::new(variant);
        ids.push(line.id.clone());
        section.lines.push(line);
    }
    refresh_section(section);
    estimate.grand_total = grand_total(estimate);
    Ok(ids)
}

/// Removes one line by id and recomputes the section and grand totals.
pub fn delete_line(
    estimate: &mut Estimate,
    section_id: &str,
    line_id: &str,
) -> Result<(), EstimateOpError> {
    ensure_active(estimate)?;
    let section = estimate
        .section_mut(section_id)
        .ok_or_else(|| EstimateOpError::SectionNotFound(section_id.to_string()))?;
    let index = section
        .lines
        .iter()
        .position(|l| l.id == line_id)
        .ok_or_else(|| EstimateOpError::LineNotFound {
            section_id: section_id.to_string(),
            line_id: line_id.to_string(),
        })?;
    section.lines.remove(index);
    refresh_section(section);
    estimate.grand_total = grand_total(estimate);
    Ok(())
}

/// Removes up to the last [`BULK_LINE_COUNT`] lines of the section,
/// clamping on short sections instead of erroring. Returns how many
/// lines were removed.
pub fn delete_ten_lines(
    estimate: &mut Estimate,
    section_id: &str,
) -> Result<usize, EstimateOpError> {
    ensure_active(estimate)?;
    let section = estimate
        .section_mut(section_id)
        .ok_or_else(|| EstimateOpError::SectionNotFound(section_id.to_string()))?;
    let keep = section.lines.len().saturating_sub(BULK_LINE_COUNT);
    let removed = section.lines.len() - keep;
    section.lines.truncate(keep);
    refresh_section(section);
    estimate.grand_total = grand_total(estimate);
    Ok(removed)
}

/// Applies one field edit, then cascades: line amount, section total,
/// grand total, in that order, so the returned estimate is never
/// totals-inconsistent.
///
/// A `ProductCode` edit consults `products`; on a hit the line's price
/// and description are replaced from the catalog record before the
/// amount recomputes, so the new amount reflects the resolved price. On
/// a miss the code is still stored and price/description keep their
/// previous values.
pub fn update_field(
    estimate: &mut Estimate,
    section_id: &str,
    line_id: &str,
    edit: FieldEdit,
    products: &dyn ProductLookup,
) -> Result<(), EstimateOpError> {
    ensure_active(estimate)?;
    let variant = estimate.variant;
    let section = estimate
        .section_mut(section_id)
        .ok_or_else(|| EstimateOpError::SectionNotFound(section_id.to_string()))?;
    let line = section
        .line_mut(line_id)
        .ok_or_else(|| EstimateOpError::LineNotFound {
            section_id: section_id.to_string(),
            line_id: line_id.to_string(),
        })?;

    apply_edit(line, edit, products)
        .map_err(|field| EstimateOpError::InvalidField { variant, field })?;

    let amount = line_amount(&line.data);
    line.data.set_amount(amount);
    refresh_section(section);
    estimate.grand_total = grand_total(estimate);
    Ok(())
}

/// Applies the edit to the line's fields, or returns the offending field
/// name when the variant does not define it. Does not touch the line on
/// rejection.
fn apply_edit(
    line: &mut Line,
    edit: FieldEdit,
    products: &dyn ProductLookup,
) -> Result<(), &'static str> {
    use crate::models::LineData::*;

    match (&mut line.data, edit) {
        (SquareFootage { measurement, .. }, FieldEdit::Measurement(value))
        | (Measurement { measurement, .. }, FieldEdit::Measurement(value)) => {
            *measurement = value;
        }
        (SquareFootage { description, .. }, FieldEdit::Description(value))
        | (ThreeField { description, .. }, FieldEdit::Description(value))
        | (Measurement { description, .. }, FieldEdit::Description(value)) => {
            *description = value;
        }
        (ThreeField {
            description_two, ..
        }, FieldEdit::DescriptionTwo(value))
        | (SevenField {
            description_two, ..
        }, FieldEdit::DescriptionTwo(value)) => {
            *description_two = value;
        }
        (ThreeField { amount, .. }, FieldEdit::Amount(value)) => {
            *amount = coerce_decimal(&value);
        }
        (SevenField { quantity, .. }, FieldEdit::Quantity(value)) => {
            *quantity = coerce_decimal(&value);
        }
        (SevenField { price, .. }, FieldEdit::Price(value)) => {
            *price = coerce_decimal(&value);
        }
        (
            SevenField {
                description_three, ..
            },
            FieldEdit::DescriptionThree(value),
        ) => {
            *description_three = value;
        }
        (
            SevenField {
                product_code,
                price,
                description,
                ..
            },
            FieldEdit::ProductCode(value),
        ) => {
            match products.lookup_product_code(&value) {
                Some(product) => {
                    *price = product.price;
                    *description = product.name;
                }
                // Keep the stale price/description; the code itself is
                // still stored and the amount recomputes from what is
                // already there.
                None => warn!(code = %value, "product code not found in catalog"),
            }
            *product_code = value;
        }
        (_, edit) => return Err(edit.field_name()),
    }
    Ok(())
}

/// Marks the estimate deleted and cascades: every section and line is
/// removed with it, leaving nothing reachable. Terminal; any later
/// operation fails.
pub fn delete_estimate(estimate: &mut Estimate) -> Result<(), EstimateOpError> {
    ensure_active(estimate)?;
    estimate.sections.clear();
    estimate.grand_total = grand_total(estimate);
    estimate.deleted = true;
    Ok(())
}

/// Sets the estimate's display name; an empty (after trim) name is a
/// no-op, preserving the prior name.
pub fn rename_calculator(estimate: &mut Estimate, new_name: &str) -> Result<(), EstimateOpError> {
    ensure_active(estimate)?;
    if new_name.trim().is_empty() {
        return Ok(());
    }
    estimate.name = new_name.to_string();
    Ok(())
}
