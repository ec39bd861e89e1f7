//! GitHub provider (REST v3) for PR file listings and review publishing.
//!
//! Endpoints used:
//! - GET  /repos/{owner}/{repo}/pulls/{number}/files
//! - POST /repos/{owner}/{repo}/pulls/{number}/reviews
//! - POST /repos/{owner}/{repo}/issues/{number}/comments  (skip notices)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{PrResult, ProviderError};
use crate::review::{ReviewComment, ReviewOutcome};

/// One PR in one repository, as addressed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct PrLocator {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // e.g. "https://api.github.com"
    token: String,
}

impl GitHubClient {
    /// Constructs a GitHub client for one bearer token (PAT or freshly minted
    /// installation token).
    pub fn new(base_api: String, token: String) -> PrResult<Self> {
        let http = Client::builder().user_agent("gale-backend/0.1").build()?;
        Ok(Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Lists the files changed in a PR, including their unified patches.
    pub async fn list_pr_files(&self, id: &PrLocator) -> PrResult<Vec<PrFile>> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/files?per_page=100",
            self.base_api, id.owner, id.repo, id.number
        );
        debug!(%url, "fetching changed files");
        let files: Vec<PrFile> = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(files)
    }

    /// Publishes the review as one atomic object: overall body plus all
    /// line-anchored draft comments. Partial posting is never attempted.
    pub async fn create_review(&self, id: &PrLocator, review: &ReviewOutcome) -> PrResult<()> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/reviews",
            self.base_api, id.owner, id.repo, id.number
        );
        let body = CreateReviewRequest {
            body: &review.summary,
            event: "COMMENT",
            comments: &review.comments,
        };
        debug!(%url, comments = review.comments.len(), "posting review");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus(status.as_u16()).into());
        }
        Ok(())
    }

    /// Posts a plain issue comment (used for size-gate skip notices).
    pub async fn create_issue_comment(&self, id: &PrLocator, body: &str) -> PrResult<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_api, id.owner, id.repo, id.number
        );
        debug!(%url, "posting issue comment");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&IssueCommentRequest { body })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus(status.as_u16()).into());
        }
        Ok(())
    }
}

/// --- GitHub request/response shapes (subset of fields we actually use) ---

/// One changed file as listed by the PR files endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PrFile {
    pub filename: String,
    /// Total changed lines (additions + deletions) in this file.
    #[serde(default)]
    pub changes: u64,
    /// Unified patch text; absent for binary or rename-only entries.
    #[serde(default)]
    pub patch: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateReviewRequest<'a> {
    body: &'a str,
    event: &'static str,
    comments: &'a [ReviewComment],
}

#[derive(Debug, Serialize)]
struct IssueCommentRequest<'a> {
    body: &'a str,
}
