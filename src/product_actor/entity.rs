use std::convert::Infallible;
use crate::actor_framework::Entity;
use crate::domain::Product;
use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;

impl Entity for Product {
    type Id = String;
    type CreateParams = Infallible;
    type Patch = Infallible;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Error = ProductError;

    fn id(&self) -> &String { &self.id }

    /// Catalog records carry their own ids and are only ever inserted.
    fn from_create_params(_id: String, params: Infallible) -> Result<Self, ProductError> {
        match params {}
    }

    /// Rejects records that could never be sold correctly.
    fn on_create(&mut self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::ValidationError("name required".to_string()));
        }
        if self.unit_price.is_negative() {
            return Err(ProductError::ValidationError(format!("negative price {}", self.unit_price)));
        }
        Ok(())
    }

    /// Stock only moves through actions.
    fn on_update(&mut self, patch: Infallible) -> Result<(), ProductError> {
        match patch {}
    }

    /// Handles product-specific actions.
    ///
    /// # Actions
    /// - `CheckStock`: Returns the current stock level
    /// - `Decrement(amount)`: Removes `amount` units, never going below zero
    /// - `Restock(amount)`: Adds `amount` units back
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => {
                Ok(ProductActionResult::CheckStock(self.available_quantity))
            }
            ProductAction::Decrement(0) | ProductAction::Restock(0) => {
                Err(ProductError::InvalidQuantity(0))
            }
            ProductAction::Decrement(amount) => {
                if self.available_quantity >= amount {
                    self.available_quantity -= amount;
                    Ok(ProductActionResult::Decrement(self.available_quantity))
                } else {
                    Err(ProductError::InsufficientStock {
                        requested: amount,
                        available: self.available_quantity,
                    })
                }
            }
            ProductAction::Restock(amount) => {
                self.available_quantity = self
                    .available_quantity
                    .checked_add(amount)
                    .ok_or(ProductError::InvalidQuantity(amount))?;
                Ok(ProductActionResult::Restock(self.available_quantity))
            }
        }
    }
}
