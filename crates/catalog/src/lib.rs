use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use shared::domain::{CatalogRecord, Money, Product, ProductId};
use thiserror::Error;
use tracing::{debug, info};

const BUILTIN_CATALOG_JSON: &str = include_str!("../data/products.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog lists product {0} more than once")]
    DuplicateId(ProductId),
    #[error("catalog price for product {0} is negative")]
    NegativePrice(ProductId),
    #[error("catalog price for product {id} is {price}, above the {max} limit")]
    PriceOutOfRange { id: ProductId, price: Money, max: Money },
}

/// A read-only supply of catalog records.
///
/// Implementations hand out borrowed records; the session state never keeps
/// references into them, it copies through [`load_catalog`].
pub trait CatalogSource: Send + Sync {
    fn records(&self) -> &[CatalogRecord];
}

#[derive(Debug, Clone)]
pub struct StaticCatalog {
    records: Vec<CatalogRecord>,
}

impl StaticCatalog {
    pub fn new(records: Vec<CatalogRecord>) -> Result<Self, CatalogError> {
        validate(&records)?;
        Ok(Self { records })
    }

    /// The product list compiled into the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG_JSON)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let records: Vec<CatalogRecord> = serde_json::from_str(raw)?;
        Self::new(records)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            products = catalog.records.len(),
            "loaded catalog file"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CatalogSource for StaticCatalog {
    fn records(&self) -> &[CatalogRecord] {
        &self.records
    }
}

fn validate(records: &[CatalogRecord]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            return Err(CatalogError::DuplicateId(record.id));
        }
        if record.price.is_negative() {
            return Err(CatalogError::NegativePrice(record.id));
        }
        if record.price > Money::MAX {
            return Err(CatalogError::PriceOutOfRange {
                id: record.id,
                price: record.price,
                max: Money::MAX,
            });
        }
    }
    Ok(())
}

/// Copies every record of `source` into fresh session products with empty
/// cart fields.
pub fn load_catalog(source: &dyn CatalogSource) -> Vec<Product> {
    let products: Vec<Product> = source
        .records()
        .iter()
        .map(Product::from_record)
        .collect();
    debug!(products = products.len(), "copied catalog into session state");
    products
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
