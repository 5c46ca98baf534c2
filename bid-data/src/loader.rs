use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use bid_core::{EstimateRepository, Product, RepositoryError};

/// Errors that can occur when loading product catalog data.
#[derive(Debug, Error)]
pub enum CatalogLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid record for code '{code}': {reason}")]
    InvalidRecord { code: String, reason: String },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for CatalogLoaderError {
    fn from(err: csv::Error) -> Self {
        CatalogLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the product catalog CSV file.
///
/// Columns:
/// - `code`: the product code SevenField lines reference (e.g. `PC-7`)
/// - `name`: display name, copied into a line's description on lookup
/// - `price`: unit price as a decimal (e.g. `5.25`)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub code: String,
    pub name: String,
    pub price: Decimal,
}

/// Loader for product catalog data from CSV files.
///
/// Reads CSV data and writes it through the `EstimateRepository` trait,
/// so it works with any backend. Loading is an upsert per code: running
/// the same file twice leaves the catalog unchanged, and a re-run with
/// updated prices replaces the old records.
pub struct ProductCatalogLoader;

impl ProductCatalogLoader {
    /// Parse product records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file
    /// or a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ProductRecord>, CatalogLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ProductRecord = result?;
            if record.code.trim().is_empty() {
                return Err(CatalogLoaderError::InvalidRecord {
                    code: record.code,
                    reason: "empty product code".to_string(),
                });
            }
            records.push(record);
        }

        Ok(records)
    }

    /// Load product records into the catalog. Returns how many records
    /// were written.
    pub async fn load<R: EstimateRepository + ?Sized>(
        repo: &R,
        records: &[ProductRecord],
    ) -> Result<usize, CatalogLoaderError> {
        let mut written = 0;

        for record in records {
            let product = Product {
                code: record.code.clone(),
                name: record.name.clone(),
                price: record.price,
            };
            repo.upsert_product(&product).await?;
            written += 1;
        }

        Ok(written)
    }
}
