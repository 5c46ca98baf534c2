//! Default repository registry with every known backend registered.
//!
//! Applications that do not need to pick backends at runtime can use
//! [`default_registry`] instead of wiring factories up themselves.

use bid_core::db::RepositoryRegistry;
use bid_db_sqlite::SqliteRepositoryFactory;

/// A registry with all bundled backends registered (currently `sqlite`).
pub fn default_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

#[cfg(test)]
mod tests {
    use bid_core::db::DbConfig;

    use super::default_registry;

    #[test]
    fn default_registry_knows_sqlite() {
        assert_eq!(default_registry().available_backends(), vec!["sqlite"]);
    }

    #[tokio::test]
    async fn default_registry_creates_sqlite_repository() {
        let registry = default_registry();
        let result = registry.create(&DbConfig::default()).await;
        assert!(
            result.is_ok(),
            "failed to create default repository: {:#?}",
            result.err()
        );
    }
}
