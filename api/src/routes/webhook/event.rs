//! GitHub webhook payload shapes (subset of fields we actually use) and the
//! trigger policy deciding which events start a review.

use pr_reviewer::ReviewRequest;
use serde::Deserialize;

/// Top-level `pull_request` event payload.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(default)]
    pub action: String,
    pub pull_request: Option<PullRequest>,
    pub repository: Option<Repository>,
    pub installation: Option<Installation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changed_files: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Installation {
    pub id: i64,
}

impl WebhookEvent {
    /// Builds the pipeline request. `None` when the payload carries no
    /// pull request or repository (e.g. ping events).
    pub fn to_review_request(&self) -> Option<ReviewRequest> {
        let pr = self.pull_request.as_ref()?;
        let repo = self.repository.as_ref()?;
        Some(ReviewRequest {
            owner: repo.owner.login.clone(),
            repo: repo.name.clone(),
            number: pr.number,
            title: pr.title.clone().unwrap_or_default(),
            description: pr.body.clone().unwrap_or_default(),
            changed_files: pr.changed_files,
            additions: pr.additions,
            deletions: pr.deletions,
            installation_id: self.installation.as_ref().map(|i| i.id),
        })
    }
}

/// Trigger policy — total order, first match wins:
///
/// 1. draft PR            → never review
/// 2. `opened`            → review
/// 3. `ready_for_review`  → review
/// 4. `synchronize`       → never review (explicit product choice: pushes to
///    an open PR do not re-trigger a review on every commit)
/// 5. anything else       → never review
pub fn should_trigger_review(action: &str, pr: &PullRequest) -> bool {
    if pr.draft {
        return false;
    }
    matches!(action, "opened" | "ready_for_review")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(draft: bool) -> PullRequest {
        PullRequest {
            number: 7,
            title: Some("Add login".into()),
            body: None,
            draft,
            additions: 10,
            deletions: 2,
            changed_files: 1,
        }
    }

    #[test]
    fn opened_and_ready_for_review_trigger() {
        assert!(should_trigger_review("opened", &pr(false)));
        assert!(should_trigger_review("ready_for_review", &pr(false)));
    }

    #[test]
    fn draft_suppresses_every_action() {
        for action in ["opened", "ready_for_review", "synchronize", "edited"] {
            assert!(!should_trigger_review(action, &pr(true)), "{action}");
        }
    }

    #[test]
    fn synchronize_never_triggers() {
        assert!(!should_trigger_review("synchronize", &pr(false)));
        assert!(!should_trigger_review("synchronize", &pr(true)));
    }

    #[test]
    fn other_actions_never_trigger() {
        for action in ["closed", "edited", "reopened", "labeled", ""] {
            assert!(!should_trigger_review(action, &pr(false)), "{action}");
        }
    }

    #[test]
    fn payload_decodes_into_review_request() {
        let payload = serde_json::json!({
            "action": "opened",
            "pull_request": {
                "number": 42,
                "title": "Fix race",
                "body": "Serializes the writers",
                "draft": false,
                "additions": 120,
                "deletions": 30,
                "changed_files": 4
            },
            "repository": { "name": "engine", "owner": { "login": "acme" } },
            "installation": { "id": 9001 }
        });
        let event: WebhookEvent = serde_json::from_value(payload).unwrap();
        let req = event.to_review_request().unwrap();
        assert_eq!(req.owner, "acme");
        assert_eq!(req.repo, "engine");
        assert_eq!(req.number, 42);
        assert_eq!(req.additions, 120);
        assert_eq!(req.installation_id, Some(9001));
    }

    #[test]
    fn ping_style_payload_yields_no_request() {
        let event: WebhookEvent = serde_json::from_value(serde_json::json!({
            "action": "ping"
        }))
        .unwrap();
        assert!(event.to_review_request().is_none());
    }

    #[test]
    fn missing_installation_is_tolerated() {
        let event: WebhookEvent = serde_json::from_value(serde_json::json!({
            "action": "opened",
            "pull_request": { "number": 1 },
            "repository": { "name": "r", "owner": { "login": "o" } }
        }))
        .unwrap();
        let req = event.to_review_request().unwrap();
        assert_eq!(req.installation_id, None);
        assert_eq!(req.title, "");
    }
}
