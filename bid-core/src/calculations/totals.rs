//! Aggregation engine: section totals and the estimate grand total.
//!
//! Totals are always re-derived from the tree rather than patched
//! incrementally; every mutation runs the refresh in dependency order
//! (section totals before the grand total). At tens of lines per section
//! the recomputation cost is irrelevant next to the drift a missed
//! incremental update site would cause.

use rust_decimal::Decimal;

use crate::models::{Estimate, Section};

/// Sum of `amount` over the section's lines. Pure; does not write the
/// section's stored total.
pub fn section_total(section: &Section) -> Decimal {
    section.lines.iter().map(|line| line.data.amount()).sum()
}

/// Sum of the stored `total` over the estimate's sections. Pure.
pub fn grand_total(estimate: &Estimate) -> Decimal {
    estimate.sections.iter().map(|section| section.total).sum()
}

/// Writes the recomputed total into one section.
pub fn refresh_section(section: &mut Section) {
    section.total = section_total(section);
}

/// Refreshes every section total, then the grand total, in that order.
pub fn refresh_totals(estimate: &mut Estimate) {
    for section in &mut estimate.sections {
        refresh_section(section);
    }
    estimate.grand_total = grand_total(estimate);
}
