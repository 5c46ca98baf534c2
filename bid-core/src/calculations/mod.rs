//! Estimate computation rules.
//!
//! Three layers, leaves first: [`measurement`] parses free-text dimension
//! and length strings, [`pricing`] derives a line's amount from its
//! fields, and [`totals`] rolls line amounts up into section totals and
//! the estimate grand total.

pub mod measurement;
pub mod pricing;
pub mod totals;

pub use measurement::{parse_feet_inches, parse_measurement};
pub use pricing::{coerce_decimal, line_amount};
pub use totals::{grand_total, refresh_section, refresh_totals, section_total};
