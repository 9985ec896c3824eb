use serde::{Deserialize, Serialize};
use super::Money;

/// Represents a product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Money,
    #[serde(rename = "quantity")]
    pub available_quantity: u32,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        available_quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
            available_quantity,
        }
    }
}
