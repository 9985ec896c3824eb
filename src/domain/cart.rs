use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use super::{Customer, Money};

/// One cart line as posted by the storefront page (`{"id": .., "qty": ..}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A cart submission. `client_total` is whatever the browser computed; it is
/// only ever compared against the server total, never charged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSubmission {
    pub lines: Vec<CartLine>,
    pub customer: Customer,
    #[serde(default)]
    pub client_total: Option<Money>,
}

impl CartSubmission {
    pub fn new(lines: Vec<CartLine>, customer: Customer) -> Self {
        Self {
            lines,
            customer,
            client_total: None,
        }
    }

    pub fn with_client_total(mut self, total: Money) -> Self {
        self.client_total = Some(total);
        self
    }

    /// Merges lines naming the same product. A zero quantity or a merged
    /// quantity that overflows is returned as the offending product id.
    pub fn merged_lines(&self) -> Result<BTreeMap<String, u32>, (String, String)> {
        let mut merged = BTreeMap::new();
        for line in &self.lines {
            if line.quantity == 0 {
                return Err((line.product_id.clone(), "quantity must be positive".to_string()));
            }
            let entry = merged.entry(line.product_id.clone()).or_insert(0u32);
            *entry = entry
                .checked_add(line.quantity)
                .ok_or_else(|| (line.product_id.clone(), "quantity too large".to_string()))?;
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Customer {
        Customer::new("Alice", "Smith", "alice@example.com")
    }

    #[test]
    fn duplicate_lines_are_summed() {
        let cart = CartSubmission::new(
            vec![CartLine::new("1234", 2), CartLine::new("44fc", 1), CartLine::new("1234", 3)],
            alice(),
        );
        let merged = cart.merged_lines().unwrap();
        assert_eq!(merged.get("1234"), Some(&5));
        assert_eq!(merged.get("44fc"), Some(&1));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let cart = CartSubmission::new(vec![CartLine::new("1234", 0)], alice());
        let (product_id, _) = cart.merged_lines().unwrap_err();
        assert_eq!(product_id, "1234");
    }

    #[test]
    fn parses_storefront_payload() {
        let json = r#"{
            "lines": [{"id": "1234", "qty": 2}],
            "customer": {"firstName": "Alice", "lastName": "Smith", "email": "alice@example.com"},
            "clientTotal": 1
        }"#;
        let cart: CartSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(cart.lines, vec![CartLine::new("1234", 2)]);
        assert_eq!(cart.client_total, Some(Money::from_minor(1)));
    }
}
