use thiserror::Error;

/// Domain errors. All of these are user-facing and non-fatal: the router
/// turns them into notices, never into a crashed dispatch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KassaError {
    /// The referenced event is not in the catalog.
    #[error("event {id} does not exist")]
    EventNotFound { id: String },

    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,
}
