use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of the product-code catalog consulted by SevenField lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub code: String,
    pub name: String,
    pub price: Decimal,
}
