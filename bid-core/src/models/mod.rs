mod actor;
mod estimate;
mod line;
mod product;
mod section;

pub use actor::Actor;
pub use estimate::{Estimate, EstimateSummary, NewEstimate};
pub use line::{CalculatorVariant, Line, LineData};
pub use product::Product;
pub use section::{DEFAULT_SECTION_TITLE, Section};
