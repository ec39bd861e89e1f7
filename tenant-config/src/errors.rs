//! Error types for the tenant configuration store.
//!
//! "Row not found" is deliberately NOT an error here — unresolved tenants are
//! an expected state and surface as `Ok(None)` from the resolver. Errors are
//! reserved for transport failures and non-success store responses.

use thiserror::Error;

/// Convenient alias for store-facing results.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure talking to the configuration store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network/transport failure (DNS, connect, reset, timeout).
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Store answered with a non-success HTTP status.
    #[error("store returned status {0}")]
    Status(u16),

    /// Store base URL is missing or malformed.
    #[error("invalid store base url: {0}")]
    InvalidBaseUrl(String),
}
