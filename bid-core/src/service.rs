//! Load → apply → save orchestration over the document store.
//!
//! Every mutation here reads the full estimate document, applies exactly
//! one engine operation to the in-memory copy, writes the whole document
//! back, and returns the refreshed estimate. That read-modify-write cycle
//! is the persistence contract: partial field patches are never written,
//! so the stored document always satisfies the totals invariants.
//!
//! Callers must serialize mutations per estimate (at most one in flight,
//! e.g. by disabling the triggering control while an operation is
//! outstanding). Overlapping operations would read the same stored
//! version and the later save would clobber the earlier one's effect;
//! the service performs no internal locking.

use thiserror::Error;
use tracing::{debug, instrument};

use crate::db::repository::{EstimateRepository, RepositoryError, ResolvedProduct};
use crate::models::{Actor, CalculatorVariant, Estimate, EstimateSummary, NewEstimate};
use crate::ops::{self, EstimateOpError, FieldEdit};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Op(#[from] EstimateOpError),
}

/// One instance per backing store; cheap to share behind the caller's
/// state layer.
pub struct EstimateService {
    repo: Box<dyn EstimateRepository>,
}

impl EstimateService {
    pub fn new(repo: Box<dyn EstimateRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_estimate(
        &self,
        actor: &Actor,
        name: &str,
        variant: CalculatorVariant,
    ) -> Result<Estimate, ServiceError> {
        let estimate = self
            .repo
            .create_estimate(
                actor,
                NewEstimate {
                    name: name.to_string(),
                    variant,
                },
            )
            .await?;
        debug!(id = %estimate.id, %variant, "created estimate");
        Ok(estimate)
    }

    pub async fn load_estimate(
        &self,
        actor: &Actor,
        estimate_id: &str,
    ) -> Result<Estimate, ServiceError> {
        Ok(self.repo.load_estimate(actor, estimate_id).await?)
    }

    pub async fn list_estimates(
        &self,
        actor: &Actor,
    ) -> Result<Vec<EstimateSummary>, ServiceError> {
        Ok(self.repo.list_estimates(actor).await?)
    }

    #[instrument(skip(self, actor))]
    pub async fn add_section(
        &self,
        actor: &Actor,
        estimate_id: &str,
    ) -> Result<Estimate, ServiceError> {
        self.mutate(actor, estimate_id, |estimate| {
            ops::add_section(estimate).map(|_| ())
        })
        .await
    }

    #[instrument(skip(self, actor))]
    pub async fn delete_section(
        &self,
        actor: &Actor,
        estimate_id: &str,
        section_id: &str,
    ) -> Result<Estimate, ServiceError> {
        self.mutate(actor, estimate_id, |estimate| {
            ops::delete_section(estimate, section_id)
        })
        .await
    }

    #[instrument(skip(self, actor, new_title))]
    pub async fn rename_section(
        &self,
        actor: &Actor,
        estimate_id: &str,
        section_id: &str,
        new_title: &str,
    ) -> Result<Estimate, ServiceError> {
        self.mutate(actor, estimate_id, |estimate| {
            ops::rename_section(estimate, section_id, new_title)
        })
        .await
    }

    #[instrument(skip(self, actor))]
    pub async fn add_line(
        &self,
        actor: &Actor,
        estimate_id: &str,
        section_id: &str,
    ) -> Result<Estimate, ServiceError> {
        self.mutate(actor, estimate_id, |estimate| {
            ops::add_line(estimate, section_id).map(|_| ())
        })
        .await
    }

    #[instrument(skip(self, actor))]
    pub async fn add_ten_lines(
        &self,
        actor: &Actor,
        estimate_id: &str,
        section_id: &str,
    ) -> Result<Estimate, ServiceError> {
        self.mutate(actor, estimate_id, |estimate| {
            ops::add_ten_lines(estimate, section_id).map(|_| ())
        })
        .await
    }

    #[instrument(skip(self, actor))]
    pub async fn delete_line(
        &self,
        actor: &Actor,
        estimate_id: &str,
        section_id: &str,
        line_id: &str,
    ) -> Result<Estimate, ServiceError> {
        self.mutate(actor, estimate_id, |estimate| {
            ops::delete_line(estimate, section_id, line_id)
        })
        .await
    }

    #[instrument(skip(self, actor))]
    pub async fn delete_ten_lines(
        &self,
        actor: &Actor,
        estimate_id: &str,
        section_id: &str,
    ) -> Result<Estimate, ServiceError> {
        self.mutate(actor, estimate_id, |estimate| {
            ops::delete_ten_lines(estimate, section_id).map(|_| ())
        })
        .await
    }

    /// Applies one field edit. For a `ProductCode` edit the catalog
    /// record is prefetched here so the engine's lookup stays
    /// synchronous; a missing record is handed through as a miss, any
    /// other repository failure aborts before the estimate is touched.
    #[instrument(skip(self, actor, edit))]
    pub async fn update_field(
        &self,
        actor: &Actor,
        estimate_id: &str,
        section_id: &str,
        line_id: &str,
        edit: FieldEdit,
    ) -> Result<Estimate, ServiceError> {
        let resolved = match &edit {
            FieldEdit::ProductCode(code) => match self.repo.get_product(code).await {
                Ok(product) => ResolvedProduct(Some(product)),
                Err(RepositoryError::NotFound) => ResolvedProduct(None),
                Err(other) => return Err(other.into()),
            },
            _ => ResolvedProduct(None),
        };

        self.mutate(actor, estimate_id, |estimate| {
            ops::update_field(estimate, section_id, line_id, edit, &resolved)
        })
        .await
    }

    #[instrument(skip(self, actor, new_name))]
    pub async fn rename_calculator(
        &self,
        actor: &Actor,
        estimate_id: &str,
        new_name: &str,
    ) -> Result<Estimate, ServiceError> {
        self.mutate(actor, estimate_id, |estimate| {
            ops::rename_calculator(estimate, new_name)
        })
        .await
    }

    /// Deletes the estimate document. Terminal: the returned estimate is
    /// marked deleted and the stored document is gone.
    #[instrument(skip(self, actor))]
    pub async fn delete_estimate(
        &self,
        actor: &Actor,
        estimate_id: &str,
    ) -> Result<Estimate, ServiceError> {
        let mut estimate = self.repo.load_estimate(actor, estimate_id).await?;
        ops::delete_estimate(&mut estimate)?;
        self.repo.delete_estimate(actor, estimate_id).await?;
        debug!(id = %estimate_id, "deleted estimate");
        Ok(estimate)
    }

    async fn mutate<F>(
        &self,
        actor: &Actor,
        estimate_id: &str,
        apply: F,
    ) -> Result<Estimate, ServiceError>
    where
        F: FnOnce(&mut Estimate) -> Result<(), EstimateOpError>,
    {
        let mut estimate = self.repo.load_estimate(actor, estimate_id).await?;
        apply(&mut estimate)?;
        self.repo.save_estimate(actor, &estimate).await?;
        Ok(estimate)
    }
}
