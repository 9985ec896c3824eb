use std::path::Path;
use tracing::info;
use crate::domain::{Money, Product};
use super::error::SystemError;

/// Products of the demo store, used when no catalog file is configured.
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new("1234", "Item1", Money::from_minor(1800), 100),
        Product::new("44fc", "Item2", Money::from_minor(2000), 50),
    ]
}

/// Reads a JSON array of `{"id", "name", "price", "quantity"}` records.
pub fn load_catalog(path: &Path) -> Result<Vec<Product>, SystemError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SystemError::Seed(format!("cannot read {}: {}", path.display(), e)))?;
    let products = parse_catalog(&raw)?;
    info!(path = %path.display(), products = products.len(), "Catalog file loaded");
    Ok(products)
}

pub fn parse_catalog(raw: &str) -> Result<Vec<Product>, SystemError> {
    serde_json::from_str(raw).map_err(|e| SystemError::Seed(format!("malformed catalog: {}", e)))
}
