use async_trait::async_trait;

use bid_core::db::repository::{EstimateRepository, RepositoryError};
use bid_core::db::{DbConfig, RepositoryFactory};

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`bid_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use bid_core::db::RepositoryRegistry;
/// use bid_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and run
    /// migrations.
    ///
    /// Accepted connection-string values:
    /// * A bare file path — e.g. `"estimates.db"`.
    /// * A sqlx-style URL — e.g. `"sqlite:estimates.db?mode=rwc"` to
    ///   create the file if it does not exist.
    /// * `":memory:"` — an ephemeral in-memory database (useful for
    ///   tests).
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn EstimateRepository>, RepositoryError> {
        let repo = SqliteRepository::new(&config.connection_string).await?;
        repo.run_migrations().await?;
        Ok(Box::new(repo))
    }
}
