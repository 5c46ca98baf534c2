use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Actor, Estimate, EstimateSummary, NewEstimate, Product};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Document store for estimates and the product-code catalog.
///
/// Estimates are whole documents: callers load one, apply one mutation in
/// memory, and save the result back (read-modify-write). Every estimate
/// method is scoped by [`Actor`], which selects the guest or per-user
/// collection.
#[async_trait]
pub trait EstimateRepository: Send + Sync {
    /// Persist a new, empty estimate and return it with its assigned id.
    async fn create_estimate(
        &self,
        actor: &Actor,
        new: NewEstimate,
    ) -> Result<Estimate, RepositoryError>;

    async fn load_estimate(
        &self,
        actor: &Actor,
        estimate_id: &str,
    ) -> Result<Estimate, RepositoryError>;

    /// Write the full document back, replacing the stored version.
    async fn save_estimate(
        &self,
        actor: &Actor,
        estimate: &Estimate,
    ) -> Result<(), RepositoryError>;

    async fn delete_estimate(
        &self,
        actor: &Actor,
        estimate_id: &str,
    ) -> Result<(), RepositoryError>;

    async fn list_estimates(
        &self,
        actor: &Actor,
    ) -> Result<Vec<EstimateSummary>, RepositoryError>;

    // Product catalog (shared across actors)
    async fn get_product(&self, code: &str) -> Result<Product, RepositoryError>;
    async fn upsert_product(&self, product: &Product) -> Result<(), RepositoryError>;
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;
}

/// Synchronous collaborator the mutation API consults when a SevenField
/// line's product code changes.
///
/// The repository itself is async; callers that already hold a repository
/// prefetch the record and hand the engine a [`ResolvedProduct`] instead.
pub trait ProductLookup {
    fn lookup_product_code(&self, code: &str) -> Option<Product>;
}

/// A product record resolved ahead of time, adapted to [`ProductLookup`].
///
/// `ResolvedProduct(None)` doubles as the lookup to pass for edits that
/// never consult the catalog.
pub struct ResolvedProduct(pub Option<Product>);

impl ProductLookup for ResolvedProduct {
    fn lookup_product_code(&self, _code: &str) -> Option<Product> {
        self.0.clone()
    }
}
