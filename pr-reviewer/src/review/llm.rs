//! Anthropic Messages API client for review generation.
//!
//! Minimal, non-streaming client:
//! - POST {endpoint}/v1/messages — single user message, plain text back
//!
//! The request carries a fixed 30 second timeout; callers in the review
//! engine degrade any failure to a fixed literal summary, so errors from
//! this module never abort a review.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

/// Fixed timeout for one model invocation.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Wire protocol version expected by the Messages API.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Failure talking to the model endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("llm returned status {0}")]
    Status(u16),

    #[error("llm response carried no content")]
    EmptyContent,

    #[error("invalid llm endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Model configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
}

impl LlmConfig {
    /// Loads the configuration from the environment. The API key is the only
    /// hard requirement; everything else has a sensible default.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("ANTHROPIC_API_BASE")
                .unwrap_or_else(|_| "https://api.anthropic.com".into()),
            api_key: std::env::var("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY is required"),
            model: std::env::var("ANTHROPIC_MODEL")
                .unwrap_or_else(|_| "claude-sonnet-4-20250514".into()),
            max_tokens: std::env::var("ANTHROPIC_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
        }
    }
}

/// Thin client for the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    cfg: LlmConfig,
    url_messages: String,
}

impl AnthropicClient {
    /// Creates a client from the given config.
    ///
    /// Validates the endpoint scheme and builds an HTTP client with the
    /// fixed request timeout and default headers.
    pub fn new(cfg: LlmConfig) -> Result<Self, LlmError> {
        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(LlmError::InvalidEndpoint(cfg.endpoint.clone()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        let url_messages = format!("{}/v1/messages", endpoint.trim_end_matches('/'));

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            max_tokens = cfg.max_tokens,
            "AnthropicClient initialized"
        );

        Ok(Self {
            http,
            cfg,
            url_messages,
        })
    }

    /// Performs one non-streaming completion: a single user message carrying
    /// the whole review prompt, first text block of the answer returned.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let started = Instant::now();
        let body = MessagesRequest {
            model: &self.cfg.model,
            max_tokens: self.cfg.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            "POST {}", self.url_messages
        );

        let resp = self
            .http
            .post(&self.url_messages)
            .header("x-api-key", &self.cfg.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            error!(
                %status,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "messages endpoint returned non-success status"
            );
            return Err(LlmError::Status(status.as_u16()));
        }

        let out: MessagesResponse = resp.json().await?;
        let text = out
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or(LlmError::EmptyContent)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "review completion finished"
        );

        Ok(text)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}
