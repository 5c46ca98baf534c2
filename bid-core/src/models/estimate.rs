use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::line::CalculatorVariant;
use super::section::Section;

/// One pricing sheet ("calculator") within a project.
///
/// `grand_total` is derived from the section totals and is refreshed by
/// every mutation; it is never edited independently. `deleted` is the
/// terminal state: once set, every further operation fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub id: String,
    pub name: String,
    pub variant: CalculatorVariant,
    pub sections: Vec<Section>,
    pub grand_total: Decimal,
    #[serde(default)]
    pub deleted: bool,
}

impl Estimate {
    /// New estimate with no sections. The id is assigned by the
    /// repository that creates the document.
    pub fn new(id: impl Into<String>, name: impl Into<String>, variant: CalculatorVariant) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variant,
            sections: Vec::new(),
            grand_total: Decimal::ZERO,
            deleted: false,
        }
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    pub fn section_mut(&mut self, section_id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == section_id)
    }
}

/// For creating new estimates (no id yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEstimate {
    pub name: String,
    pub variant: CalculatorVariant,
}

/// List-view projection of an estimate; enough to render a project's
/// calculator index without loading each full document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateSummary {
    pub id: String,
    pub name: String,
    pub variant: CalculatorVariant,
    pub grand_total: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_estimate_is_empty_and_active() {
        let estimate = Estimate::new("e1", "Garage", CalculatorVariant::SquareFootage);
        assert_eq!(estimate.sections.len(), 0);
        assert_eq!(estimate.grand_total, Decimal::ZERO);
        assert!(!estimate.deleted);
    }

    #[test]
    fn section_lookup_by_id() {
        let mut estimate = Estimate::new("e1", "Garage", CalculatorVariant::ThreeField);
        estimate.sections.push(Section::new(estimate.variant));
        let id = estimate.sections[0].id.clone();
        assert!(estimate.section(&id).is_some());
        assert!(estimate.section("missing").is_none());
    }
}
