/// Payment ownership and fulfillment actions.
///
/// A checkout claims the order before calling the gateway and must end the
/// claim with exactly one of `Release`, `MarkPaid` or `Reject`.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    ClaimPayment,
    /// Gives the claim back; the order stays pending and may be retried.
    ReleasePayment,
    MarkPaid { charge_id: String },
    /// The gateway refused the card; the order is cancelled.
    RejectPayment,
    /// Every line of a paid order has been taken from stock.
    MarkFulfilled,
}

/// Every action returns the order as it is after the action.
pub type OrderActionResult = crate::domain::Order;
