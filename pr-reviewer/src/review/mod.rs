//! Review protocol engine: prompt → model → parsed, postable result.
//!
//! The engine is deliberately total: any model failure degrades to a fixed
//! literal summary so the orchestrator always has something it can publish.

pub mod llm;
pub mod parser;
pub mod prompt;

use serde::Serialize;
use tenant_config::RepositoryPolicy;
use tracing::error;

use llm::{AnthropicClient, LlmError};

/// Diff side for every line comment: the post-change (right-hand) file.
pub const COMMENT_SIDE: &str = "RIGHT";

/// Product identity header prepended to every posted summary.
const BRAND_HEADER: &str = "## 🌬️ Gale AI Code Review\n\n";

/// Separator and lead-in between summary and poem.
const POEM_LEAD: &str = "\n\n---\n\n**And now, a little poem about your changes 🌬️✨**\n";

/// Literal summaries used when the model cannot be reached or answers empty.
const GENERATION_ERROR_SUMMARY: &str = "Error generating AI review";
const EMPTY_RESPONSE_SUMMARY: &str = "No response from the model";

/// A single line-anchored review comment.
///
/// `line` must refer to a line present in the post-change file content as
/// represented in the diff; comments on untouched context lines are kept but
/// may be rejected by GitHub when the review is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewComment {
    pub path: String,
    pub line: u32,
    pub side: &'static str,
    pub body: String,
}

/// Assembled review: overall summary (poem folded in) plus line comments.
/// Comment order follows the model response for deterministic testing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewOutcome {
    pub summary: String,
    pub comments: Vec<ReviewComment>,
}

/// Generates the review for one PR.
///
/// Never fails: network errors, non-success statuses and empty model answers
/// all degrade to a literal summary with no comments.
pub async fn generate_review(
    llm: &AnthropicClient,
    title: &str,
    description: &str,
    diff: &str,
    policy: &RepositoryPolicy,
) -> ReviewOutcome {
    let prompt = prompt::build_review_prompt(title, description, diff, policy);

    let text = match llm.generate(&prompt).await {
        Ok(text) => text,
        Err(LlmError::EmptyContent) => {
            error!("model returned no content");
            return literal_outcome(EMPTY_RESPONSE_SUMMARY);
        }
        Err(e) => {
            error!(error = %e, "review generation failed");
            return literal_outcome(GENERATION_ERROR_SUMMARY);
        }
    };

    assemble(parser::parse_response(&text))
}

/// Folds the parsed sections into the final postable outcome.
fn assemble(parsed: parser::ParsedResponse) -> ReviewOutcome {
    let mut summary = String::from(BRAND_HEADER);
    summary.push_str(&parsed.summary);
    if let Some(poem) = &parsed.poem {
        summary.push_str(POEM_LEAD);
        summary.push_str(poem);
    }
    ReviewOutcome {
        summary,
        comments: parsed.comments,
    }
}

fn literal_outcome(text: &str) -> ReviewOutcome {
    ReviewOutcome {
        summary: format!("{BRAND_HEADER}{text}"),
        comments: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_header_is_prepended_unconditionally() {
        let out = assemble(parser::parse_response("SUMMARY:$$Looks good$$"));
        assert!(out.summary.starts_with("## 🌬️ Gale AI Code Review\n\n"));
        assert!(out.summary.contains("Looks good"));
    }

    #[test]
    fn poem_is_appended_to_summary_not_separate() {
        let out = assemble(parser::parse_response(
            "SUMMARY:$$Solid change$$ POEM:$$Roses are red$$",
        ));
        assert!(out.summary.contains("Solid change"));
        assert!(out.summary.contains("---"));
        assert!(out.summary.contains("Roses are red"));
        // The poem lives inside the summary; comments are untouched.
        assert!(out.comments.is_empty());
    }

    #[test]
    fn missing_poem_leaves_no_separator() {
        let out = assemble(parser::parse_response("SUMMARY:$$Plain$$"));
        assert!(!out.summary.contains("---"));
    }

    #[test]
    fn literal_outcome_is_postable() {
        let out = literal_outcome(GENERATION_ERROR_SUMMARY);
        assert!(out.summary.contains("Error generating AI review"));
        assert!(out.summary.starts_with("## 🌬️ Gale AI Code Review"));
        assert!(out.comments.is_empty());
    }

    #[test]
    fn serialized_comment_matches_review_api_shape() {
        let c = ReviewComment {
            path: "src/app.rs".into(),
            line: 12,
            side: COMMENT_SIDE,
            body: "🧰 **nit**:\n\nRename this.".into(),
        };
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["path"], "src/app.rs");
        assert_eq!(json["line"], 12);
        assert_eq!(json["side"], "RIGHT");
    }
}
