use pr_reviewer::ReviewerContext;
use pr_reviewer::errors::PrResult;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared secret for webhook signature validation. Empty means
    /// verification is skipped — explicitly insecure, local use only.
    pub webhook_secret: String,
    /// Review pipeline collaborators (auth strategy, resolver, model client).
    pub reviewer: ReviewerContext,
}

impl AppState {
    /// Load shared state from environment variables.
    pub fn from_env() -> PrResult<Self> {
        Ok(Self {
            webhook_secret: std::env::var("WEBHOOK_SECRET").unwrap_or_default(),
            reviewer: ReviewerContext::from_env()?,
        })
    }
}
