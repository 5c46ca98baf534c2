//! Integration tests for product catalog loading using the SQLite backend.

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use sqlx::sqlite::SqlitePoolOptions;

use bid_core::EstimateRepository;
use bid_data::ProductCatalogLoader;
use bid_db_sqlite::SqliteRepository;

const TEST_CSV: &str = include_str!("../test-data/products.csv");

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

#[tokio::test]
async fn test_load_full_catalog() {
    let repo = setup_test_db().await;

    let records = ProductCatalogLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");
    let written = ProductCatalogLoader::load(&repo, &records)
        .await
        .expect("Failed to load catalog");

    assert_eq!(written, 7);
    assert_eq!(repo.list_products().await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_load_and_retrieve_product() {
    let repo = setup_test_db().await;

    let records = ProductCatalogLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");
    ProductCatalogLoader::load(&repo, &records)
        .await
        .expect("Failed to load catalog");

    let product = repo.get_product("PC-7").await.expect("Should find PC-7");

    assert_eq!(product.name, "Pressure treated 2x4");
    assert_eq!(product.price, dec!(6.75));
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    let repo = setup_test_db().await;

    let records = ProductCatalogLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");
    ProductCatalogLoader::load(&repo, &records)
        .await
        .expect("Failed to load catalog");
    ProductCatalogLoader::load(&repo, &records)
        .await
        .expect("Failed to reload catalog");

    assert_eq!(repo.list_products().await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_reload_with_new_price_replaces_record() {
    let repo = setup_test_db().await;

    let records = ProductCatalogLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");
    ProductCatalogLoader::load(&repo, &records)
        .await
        .expect("Failed to load catalog");

    let updated_csv = "code,name,price\nPC-1,2x4 stud 8ft,5.95\n";
    let updated = ProductCatalogLoader::parse(updated_csv.as_bytes()).expect("Failed to parse CSV");
    ProductCatalogLoader::load(&repo, &updated)
        .await
        .expect("Failed to reload catalog");

    let product = repo.get_product("PC-1").await.expect("Should find PC-1");
    assert_eq!(product.price, dec!(5.95));
    assert_eq!(repo.list_products().await.unwrap().len(), 7);
}
