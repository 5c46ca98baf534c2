use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which kind of pricing sheet an estimate is. Fixed at creation; decides
/// the field set every line carries and the formula that derives its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorVariant {
    SquareFootage,
    ThreeField,
    SevenField,
    Measurement,
}

impl CalculatorVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SquareFootage => "square_footage",
            Self::ThreeField => "three_field",
            Self::SevenField => "seven_field",
            Self::Measurement => "measurement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "square_footage" => Some(Self::SquareFootage),
            "three_field" => Some(Self::ThreeField),
            "seven_field" => Some(Self::SevenField),
            "measurement" => Some(Self::Measurement),
            _ => None,
        }
    }
}

impl std::fmt::Display for CalculatorVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-variant line fields. A line can only ever hold the fields its
/// variant defines, so a cross-variant field is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum LineData {
    SquareFootage {
        /// Raw dimension text, e.g. `"60 x 114"`.
        measurement: String,
        description: String,
        /// Derived: width × height of `measurement`.
        amount: Decimal,
    },
    ThreeField {
        description: String,
        description_two: String,
        /// Directly user-supplied; no derivation formula exists for this
        /// variant.
        amount: Decimal,
    },
    SevenField {
        quantity: Decimal,
        product_code: String,
        price: Decimal,
        /// Product name from the catalog lookup; not directly editable.
        description: String,
        /// Free-form note.
        description_two: String,
        /// Length as `"feet-inches"`, e.g. `"11-0"`.
        description_three: String,
        /// Derived: quantity × price × length in feet.
        amount: Decimal,
    },
    Measurement {
        measurement: String,
        description: String,
        amount: Decimal,
    },
}

impl LineData {
    /// Zeroed/empty defaults for a freshly added line of `variant`.
    pub fn default_for(variant: CalculatorVariant) -> Self {
        match variant {
            CalculatorVariant::SquareFootage => Self::SquareFootage {
                measurement: String::new(),
                description: String::new(),
                amount: Decimal::ZERO,
            },
            CalculatorVariant::ThreeField => Self::ThreeField {
                description: String::new(),
                description_two: String::new(),
                amount: Decimal::ZERO,
            },
            CalculatorVariant::SevenField => Self::SevenField {
                quantity: Decimal::ZERO,
                product_code: String::new(),
                price: Decimal::ZERO,
                description: String::new(),
                description_two: String::new(),
                description_three: String::new(),
                amount: Decimal::ZERO,
            },
            CalculatorVariant::Measurement => Self::Measurement {
                measurement: String::new(),
                description: String::new(),
                amount: Decimal::ZERO,
            },
        }
    }

    pub fn variant(&self) -> CalculatorVariant {
        match self {
            Self::SquareFootage { .. } => CalculatorVariant::SquareFootage,
            Self::ThreeField { .. } => CalculatorVariant::ThreeField,
            Self::SevenField { .. } => CalculatorVariant::SevenField,
            Self::Measurement { .. } => CalculatorVariant::Measurement,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Self::SquareFootage { amount, .. }
            | Self::ThreeField { amount, .. }
            | Self::SevenField { amount, .. }
            | Self::Measurement { amount, .. } => *amount,
        }
    }

    pub(crate) fn set_amount(&mut self, value: Decimal) {
        match self {
            Self::SquareFootage { amount, .. }
            | Self::ThreeField { amount, .. }
            | Self::SevenField { amount, .. }
            | Self::Measurement { amount, .. } => *amount = value,
        }
    }
}

/// One row of an estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    #[serde(flatten)]
    pub data: LineData,
}

impl Line {
    pub fn new(variant: CalculatorVariant) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            data: LineData::default_for(variant),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn variant_codes_round_trip() {
        for variant in [
            CalculatorVariant::SquareFootage,
            CalculatorVariant::ThreeField,
            CalculatorVariant::SevenField,
            CalculatorVariant::Measurement,
        ] {
            assert_eq!(CalculatorVariant::parse(variant.as_str()), Some(variant));
        }
    }

    #[test]
    fn unknown_variant_code_is_rejected() {
        assert_eq!(CalculatorVariant::parse("five_field"), None);
    }

    #[test]
    fn default_line_matches_its_variant() {
        for variant in [
            CalculatorVariant::SquareFootage,
            CalculatorVariant::ThreeField,
            CalculatorVariant::SevenField,
            CalculatorVariant::Measurement,
        ] {
            let line = Line::new(variant);
            assert_eq!(line.data.variant(), variant);
            assert_eq!(line.data.amount(), Decimal::ZERO);
        }
    }

    #[test]
    fn fresh_lines_get_distinct_ids() {
        let a = Line::new(CalculatorVariant::ThreeField);
        let b = Line::new(CalculatorVariant::ThreeField);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn set_amount_updates_every_variant() {
        let mut line = Line::new(CalculatorVariant::SquareFootage);
        line.data.set_amount(dec!(12.5));
        assert_eq!(line.data.amount(), dec!(12.5));
    }
}
