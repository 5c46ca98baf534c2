pub mod loader;

pub use loader::{CatalogLoaderError, ProductCatalogLoader, ProductRecord};
