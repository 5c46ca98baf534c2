use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{FromRow, sqlite::SqlitePool};
use uuid::Uuid;

use bid_core::{
    Actor, CalculatorVariant, Estimate, EstimateRepository, EstimateSummary, NewEstimate, Product,
    RepositoryError,
};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self, RepositoryError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<(), RepositoryError> {
        tracing::debug!("running sqlite migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(FromRow)]
struct EstimateSummaryRow {
    id: String,
    name: String,
    variant: String,
    grand_total: String,
}

impl TryFrom<EstimateSummaryRow> for EstimateSummary {
    type Error = RepositoryError;

    fn try_from(row: EstimateSummaryRow) -> Result<Self, Self::Error> {
        Ok(EstimateSummary {
            id: row.id,
            name: row.name,
            variant: parse_variant(&row.variant)?,
            grand_total: parse_decimal(&row.grand_total)?,
        })
    }
}

fn parse_decimal(s: &str) -> Result<Decimal, RepositoryError> {
    s.parse::<Decimal>()
        .map_err(|e| RepositoryError::Database(format!("Failed to parse decimal '{}': {}", s, e)))
}

fn parse_variant(s: &str) -> Result<CalculatorVariant, RepositoryError> {
    CalculatorVariant::parse(s)
        .ok_or_else(|| RepositoryError::Database(format!("Invalid calculator variant: {s}")))
}

fn parse_document(s: &str) -> Result<Estimate, RepositoryError> {
    serde_json::from_str(s)
        .map_err(|e| RepositoryError::Database(format!("Failed to parse estimate document: {e}")))
}

fn to_document(estimate: &Estimate) -> Result<String, RepositoryError> {
    serde_json::to_string(estimate)
        .map_err(|e| RepositoryError::Database(format!("Failed to serialize estimate: {e}")))
}

fn now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[async_trait]
impl EstimateRepository for SqliteRepository {
    async fn create_estimate(
        &self,
        actor: &Actor,
        new: NewEstimate,
    ) -> Result<Estimate, RepositoryError> {
        let estimate = Estimate::new(Uuid::new_v4().to_string(), new.name, new.variant);
        let timestamp = now();

        sqlx::query(
            "INSERT INTO estimates (id, owner, name, variant, grand_total, document, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&estimate.id)
        .bind(actor.scope_key())
        .bind(&estimate.name)
        .bind(estimate.variant.as_str())
        .bind(estimate.grand_total.to_string())
        .bind(to_document(&estimate)?)
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(estimate)
    }

    async fn load_estimate(
        &self,
        actor: &Actor,
        estimate_id: &str,
    ) -> Result<Estimate, RepositoryError> {
        let document: String =
            sqlx::query_scalar("SELECT document FROM estimates WHERE id = ? AND owner = ?")
                .bind(estimate_id)
                .bind(actor.scope_key())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?
                .ok_or(RepositoryError::NotFound)?;

        parse_document(&document)
    }

    async fn save_estimate(
        &self,
        actor: &Actor,
        estimate: &Estimate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE estimates
             SET name = ?, grand_total = ?, document = ?, updated_at = ?
             WHERE id = ? AND owner = ?",
        )
        .bind(&estimate.name)
        .bind(estimate.grand_total.to_string())
        .bind(to_document(estimate)?)
        .bind(now())
        .bind(&estimate.id)
        .bind(actor.scope_key())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_estimate(
        &self,
        actor: &Actor,
        estimate_id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM estimates WHERE id = ? AND owner = ?")
            .bind(estimate_id)
            .bind(actor.scope_key())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_estimates(
        &self,
        actor: &Actor,
    ) -> Result<Vec<EstimateSummary>, RepositoryError> {
        let rows: Vec<EstimateSummaryRow> = sqlx::query_as(
            "SELECT id, name, variant, grand_total FROM estimates
             WHERE owner = ? ORDER BY created_at",
        )
        .bind(actor.scope_key())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    async fn get_product(&self, code: &str) -> Result<Product, RepositoryError> {
        let row: (String, String, String) =
            sqlx::query_as("SELECT code, name, price FROM products WHERE code = ?")
                .bind(code)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?
                .ok_or(RepositoryError::NotFound)?;

        Ok(Product {
            code: row.0,
            name: row.1,
            price: parse_decimal(&row.2)?,
        })
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO products (code, name, price) VALUES (?, ?, ?)
             ON CONFLICT (code) DO UPDATE SET name = excluded.name, price = excluded.price",
        )
        .bind(&product.code)
        .bind(&product.name)
        .bind(product.price.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT code, name, price FROM products ORDER BY code")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|(code, name, price)| {
                Ok(Product {
                    code,
                    name,
                    price: parse_decimal(&price)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use bid_core::ops;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    fn new_estimate(name: &str, variant: CalculatorVariant) -> NewEstimate {
        NewEstimate {
            name: name.to_string(),
            variant,
        }
    }

    #[tokio::test]
    async fn test_create_and_load_estimate() {
        let repo = setup_test_db().await;
        let actor = Actor::Guest;

        let created = repo
            .create_estimate(&actor, new_estimate("Deck", CalculatorVariant::SquareFootage))
            .await
            .expect("Should create estimate");

        assert!(!created.id.is_empty());
        assert_eq!(created.name, "Deck");
        assert!(created.sections.is_empty());

        let loaded = repo
            .load_estimate(&actor, &created.id)
            .await
            .expect("Should load estimate");
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn test_load_estimate_not_found() {
        let repo = setup_test_db().await;

        let result = repo.load_estimate(&Actor::Guest, "missing").await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_save_round_trips_full_document() {
        let repo = setup_test_db().await;
        let actor = Actor::User("u1".to_string());

        let mut estimate = repo
            .create_estimate(&actor, new_estimate("Deck", CalculatorVariant::ThreeField))
            .await
            .expect("Should create estimate");

        let section = ops::add_section(&mut estimate).expect("Should add section");
        let line = estimate.sections[0].lines[0].id.clone();
        ops::update_field(
            &mut estimate,
            &section,
            &line,
            bid_core::FieldEdit::Amount("125.50".to_string()),
            &bid_core::ResolvedProduct(None),
        )
        .expect("Should update field");

        repo.save_estimate(&actor, &estimate)
            .await
            .expect("Should save estimate");

        let loaded = repo
            .load_estimate(&actor, &estimate.id)
            .await
            .expect("Should load estimate");
        assert_eq!(loaded, estimate);
        assert_eq!(loaded.grand_total, dec!(125.50));
    }

    #[tokio::test]
    async fn test_save_unknown_estimate_is_not_found() {
        let repo = setup_test_db().await;
        let estimate = Estimate::new("ghost", "Ghost", CalculatorVariant::Measurement);

        let result = repo.save_estimate(&Actor::Guest, &estimate).await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_estimates_are_scoped_by_actor() {
        let repo = setup_test_db().await;
        let guest = Actor::Guest;
        let user = Actor::User("u1".to_string());

        let created = repo
            .create_estimate(&guest, new_estimate("Guest Job", CalculatorVariant::Measurement))
            .await
            .expect("Should create estimate");

        // Another actor cannot load, save, or delete the document.
        assert!(matches!(
            repo.load_estimate(&user, &created.id).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.save_estimate(&user, &created).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            repo.delete_estimate(&user, &created.id).await,
            Err(RepositoryError::NotFound)
        ));

        assert_eq!(repo.list_estimates(&user).await.unwrap().len(), 0);
        assert_eq!(repo.list_estimates(&guest).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_estimate() {
        let repo = setup_test_db().await;
        let actor = Actor::Guest;

        let created = repo
            .create_estimate(&actor, new_estimate("Deck", CalculatorVariant::SevenField))
            .await
            .expect("Should create estimate");

        repo.delete_estimate(&actor, &created.id)
            .await
            .expect("Should delete estimate");

        assert!(matches!(
            repo.load_estimate(&actor, &created.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_estimates_returns_summaries() {
        let repo = setup_test_db().await;
        let actor = Actor::Guest;

        repo.create_estimate(&actor, new_estimate("First", CalculatorVariant::SquareFootage))
            .await
            .expect("Should create estimate");
        repo.create_estimate(&actor, new_estimate("Second", CalculatorVariant::SevenField))
            .await
            .expect("Should create estimate");

        let summaries = repo.list_estimates(&actor).await.expect("Should list");

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].name, "First");
        assert_eq!(summaries[0].variant, CalculatorVariant::SquareFootage);
        assert_eq!(summaries[0].grand_total, dec!(0));
        assert_eq!(summaries[1].name, "Second");
    }

    #[tokio::test]
    async fn test_product_upsert_and_get() {
        let repo = setup_test_db().await;

        let product = Product {
            code: "PC-7".to_string(),
            name: "2x4 stud".to_string(),
            price: dec!(5.25),
        };
        repo.upsert_product(&product).await.expect("Should insert");

        let fetched = repo.get_product("PC-7").await.expect("Should fetch");
        assert_eq!(fetched, product);

        // Upsert with the same code replaces the record.
        let updated = Product {
            price: dec!(6.00),
            ..product
        };
        repo.upsert_product(&updated).await.expect("Should update");
        let fetched = repo.get_product("PC-7").await.expect("Should fetch");
        assert_eq!(fetched.price, dec!(6.00));

        assert_eq!(repo.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let repo = setup_test_db().await;

        let result = repo.get_product("MISSING").await;

        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
