//! Public entry for the Gale review pipeline.
//!
//! Single high-level function to run the whole pipeline for one pull request:
//!
//! 1) **Tenant policy** — resolve Installation → Organization → Repository in
//!    the configuration store; an unresolved repository is untracked and the
//!    PR is skipped silently.
//! 2) **Size gate** — classify the PR by change volume; hard skips post a
//!    notice comment instead of a review, warnings carry a banner forward.
//! 3) **Credential** — installation-scoped App token (minted per review) or
//!    the static PAT, depending on the startup strategy.
//! 4) **Diff** — list changed files, drop binary/oversized ones, concatenate
//!    the rest with file boundary markers.
//! 5) **Protocol engine** — build the prompt, call the model, parse the
//!    sectioned response into a summary and line comments.
//! 6) **Publish** — one atomic review creation call (body + draft comments).
//!
//! The pipeline uses `tracing` for per-stage logging and enum dispatch for
//! provider/credential variants; no `async-trait`, no `Box<dyn ...>`. Any
//! upstream I/O failure is terminal for the invocation — no retries, no
//! partial posting.

pub mod auth;
pub mod diff;
pub mod errors;
pub mod github;
pub mod review;
pub mod size_gate;

use tracing::{debug, info};

use auth::GithubAuth;
use errors::PrResult;
use github::{GitHubClient, PrLocator};
use review::llm::{AnthropicClient, LlmConfig};
use size_gate::SizeCheck;
use tenant_config::ConfigResolver;

/// Long-lived collaborators shared by all review invocations.
///
/// Constructed once at startup and injected into the HTTP layer; holds no
/// per-PR state.
#[derive(Clone)]
pub struct ReviewerContext {
    /// GitHub REST base, e.g. "https://api.github.com".
    pub github_api_base: String,
    /// Credential strategy selected at startup.
    pub auth: GithubAuth,
    /// Model client used for every review.
    pub llm: AnthropicClient,
    /// Tenant policy resolver (queried fresh per invocation).
    pub resolver: ConfigResolver,
}

impl ReviewerContext {
    /// Assembles the context from environment variables.
    pub fn from_env() -> PrResult<Self> {
        Ok(Self {
            github_api_base: std::env::var("GITHUB_API_BASE")
                .unwrap_or_else(|_| "https://api.github.com".into()),
            auth: GithubAuth::from_env()?,
            llm: AnthropicClient::new(LlmConfig::from_env())?,
            resolver: ConfigResolver::from_env()?,
        })
    }
}

/// Everything the pipeline needs to know about one PR, extracted from the
/// webhook payload before the task is spawned.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub description: String,
    /// PR-level aggregates for the size gate.
    pub changed_files: u64,
    pub additions: u64,
    pub deletions: u64,
    /// External GitHub App installation id, when delivered with the event.
    pub installation_id: Option<i64>,
}

/// Runs the whole pipeline for one PR.
///
/// Owns the `ReviewOutcome` and diff for this invocation; nothing outlives
/// the call. Callers run this inside a spawned task — failures here are
/// logged by the caller and never reach the webhook response.
pub async fn run_review(ctx: &ReviewerContext, req: ReviewRequest) -> PrResult<()> {
    let id = PrLocator {
        owner: req.owner.clone(),
        repo: req.repo.clone(),
        number: req.number,
    };
    info!(
        owner = %id.owner,
        repo = %id.repo,
        number = id.number,
        "processing pull request"
    );

    // ---------------------------
    // Step 1: tenant policy
    // ---------------------------
    let installation_id = req.installation_id.unwrap_or(0);
    let Some(policy) = ctx
        .resolver
        .resolve_policy(installation_id, &req.owner, &req.repo)
        .await?
    else {
        info!(
            owner = %id.owner,
            repo = %id.repo,
            "repository not configured, skipping review"
        );
        return Ok(());
    };
    debug!(precision = ?policy.precision, "policy resolved");

    // ---------------------------
    // Step 2: size gate
    // ---------------------------
    let gate = size_gate::check_pr_size(req.changed_files, req.additions, req.deletions);
    if let SizeCheck::Skip(notice) = &gate {
        info!(number = id.number, "PR too large, posting skip notice");
        let token = ctx
            .auth
            .credential(&ctx.github_api_base, installation_id)
            .await?;
        let client = GitHubClient::new(ctx.github_api_base.clone(), token)?;
        client.create_issue_comment(&id, notice).await?;
        return Ok(());
    }

    // ---------------------------
    // Step 3: credential
    // ---------------------------
    let token = ctx
        .auth
        .credential(&ctx.github_api_base, installation_id)
        .await?;
    let client = GitHubClient::new(ctx.github_api_base.clone(), token)?;

    // ---------------------------
    // Step 4: diff
    // ---------------------------
    let files = client.list_pr_files(&id).await?;
    let diff = diff::build_diff_document(&files);
    debug!(
        files = files.len(),
        diff_len = diff.len(),
        "diff assembled"
    );

    // ---------------------------
    // Step 5: protocol engine
    // ---------------------------
    let mut outcome =
        review::generate_review(&ctx.llm, &req.title, &req.description, &diff, &policy).await;

    // Step 6: warning banner, if the gate flagged one.
    if let SizeCheck::Warn(banner) = &gate {
        outcome.summary = format!("{banner}{}", outcome.summary);
    }

    // ---------------------------
    // Step 7: publish
    // ---------------------------
    client.create_review(&id, &outcome).await?;
    info!(
        number = id.number,
        comments = outcome.comments.len(),
        "review published"
    );

    Ok(())
}
