pub mod calculations;
pub mod db;
pub mod models;
pub mod ops;
pub mod service;

pub use db::repository::{EstimateRepository, ProductLookup, RepositoryError, ResolvedProduct};
pub use models::*;
pub use ops::{EstimateOpError, FieldEdit};
pub use service::{EstimateService, ServiceError};
