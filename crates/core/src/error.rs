//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Keep this focused on deterministic failures of ledger operations
/// (malformed movements, sufficiency checks, missing keys). Every error is
/// returned to the immediate caller; the engine performs no silent recovery
/// besides the transfer rollback, which is itself surfaced as `TransferFailed`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed movement input (non-positive quantity, missing reason on OUT,
    /// unknown item/warehouse). Not retriable; the caller must correct input.
    #[error("invalid movement: {0}")]
    InvalidMovement(String),

    /// Sufficiency check failed at validation or at commit-time re-check.
    /// The caller may retry with an adjusted quantity or after backoff.
    #[error("insufficient stock: available {available}, requested {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    /// A partial transfer commit was detected and compensated. The rollback
    /// already succeeded when this is surfaced: the ledger is left as if the
    /// transfer never happened.
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// Reference key or item/warehouse absent for a read/delete.
    #[error("not found")]
    NotFound,

    /// Malformed query parameters (inverted date range, negative threshold,
    /// unparseable identifier).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Infrastructure fault in the record store (e.g. poisoned lock).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn invalid_movement(msg: impl Into<String>) -> Self {
        Self::InvalidMovement(msg.into())
    }

    pub fn insufficient_stock(available: i64, requested: i64) -> Self {
        Self::InsufficientStock {
            available,
            requested,
        }
    }

    pub fn transfer_failed(msg: impl Into<String>) -> Self {
        Self::TransferFailed(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
