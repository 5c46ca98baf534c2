use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::line::{CalculatorVariant, Line};

/// Title shown when the user has not named a section yet.
pub const DEFAULT_SECTION_TITLE: &str = "Untitled Section";

/// A named grouping of lines within an estimate. Line order is display
/// order and is preserved across mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub lines: Vec<Line>,
    /// Derived: sum of `amount` over `lines`. Never edited directly.
    pub total: Decimal,
}

impl Section {
    /// New section with one default blank line of the owning estimate's
    /// variant.
    pub fn new(variant: CalculatorVariant) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_SECTION_TITLE.to_string(),
            lines: vec![Line::new(variant)],
            total: Decimal::ZERO,
        }
    }

    pub fn line(&self, line_id: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn line_mut(&mut self, line_id: &str) -> Option<&mut Line> {
        self.lines.iter_mut().find(|l| l.id == line_id)
    }
}
