use provenance_common::product::ProductId;
use thiserror::Error;

/// Failure taxonomy for ledger operations.
///
/// Every mutator validates fully before writing: on any of these, no field
/// has changed and no history event has been appended.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Role or custody check failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Operation not valid in the product's current lifecycle position.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Rejected input value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Attached payment does not equal the required amount.
    #[error("payment mismatch: expected {expected}, got {actual}")]
    PaymentMismatch { expected: u128, actual: u128 },

    /// Unknown product id.
    #[error("product {0} not found")]
    NotFound(ProductId),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
