/// Custom actions for Product entities.
///
/// These actions represent domain-specific operations that can be performed
/// on a product beyond standard CRUD operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Removes sold units from stock.
    ///
    /// # Errors
    /// Fails without touching the stock if the amount exceeds what is available.
    Decrement(u32),
    /// Puts units back, compensating an earlier `Decrement`.
    Restock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    CheckStock(u32),
    /// Remaining stock after the decrement
    Decrement(u32),
    /// Stock after the restock
    Restock(u32),
}
