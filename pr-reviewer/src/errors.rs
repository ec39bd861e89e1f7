//! Crate-wide error hierarchy for pr-reviewer.
//!
//! Goals:
//! - Single root `Error` for all public functions.
//! - Status-aware mapping for GitHub calls (401→Unauthorized, 429→RateLimited,
//!   5xx→Server, etc.).
//! - Ergonomic `?` via `From` impls; no dynamic dispatch.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type PrResult<T> = Result<T, Error>;

/// Root error type for the pr-reviewer crate.
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub API related failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// GitHub App authentication failure (key, signing, token exchange).
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Tenant configuration store failure.
    #[error(transparent)]
    Store(#[from] tenant_config::StoreError),

    /// Model client construction failure (bad endpoint, client build).
    #[error(transparent)]
    Llm(#[from] crate::review::llm::LlmError),

    /// Configuration problems (missing tokens, bad base URL, etc.).
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Detailed provider-specific error used by the GitHub client.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Gateway/Server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status not covered above.
    #[error("http status error: {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of a provider response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// GitHub App authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Private key file could not be read.
    #[error("failed to read private key: {0}")]
    KeyRead(#[from] std::io::Error),

    /// PEM could not be parsed or the assertion could not be signed.
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Token exchange endpoint answered with a non-success status.
    #[error("installation token exchange failed: status {0}")]
    Exchange(u16),
}

/// Configuration and setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

// ===== Conversions for `?` ergonomics =====

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Provider(ProviderError::from(e))
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ProviderError::Timeout;
        }
        if let Some(status) = e.status() {
            let code = status.as_u16();
            return match code {
                401 => ProviderError::Unauthorized,
                403 => ProviderError::Forbidden,
                404 => ProviderError::NotFound,
                429 => ProviderError::RateLimited,
                500..=599 => ProviderError::Server(code),
                _ => ProviderError::HttpStatus(code),
            };
        }
        if e.is_decode() {
            return ProviderError::InvalidResponse(e.to_string());
        }
        ProviderError::Network(e.to_string())
    }
}
