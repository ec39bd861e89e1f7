//! Multi-tenant review policy resolution.
//!
//! Policies live in an external PostgREST-style store and are resolved in a
//! strict three-level walk:
//!
//! 1. Installation — external GitHub App installation id → internal row id
//! 2. Organization — by name, scoped to that installation
//! 3. Repository   — exact name first, then wildcard `"*"`, then `"default"`
//!
//! The walk must always run in this order: organization and repository names
//! are only unique within their parent scope, so matching a repository name
//! across installations would hand one tenant another tenant's policy.
//!
//! A miss at any level means the repository is untracked and the caller skips
//! the PR silently — un-provisioned tenants are an expected state, not a
//! fault. Lookups hit the store fresh on every call; nothing is cached.

pub mod errors;
pub mod store;

pub use errors::{StoreError, StoreResult};
pub use store::StoreClient;

use store::{OrganizationRow, RepositoryRow};
use tracing::{debug, warn};

/// How strict the model is instructed to be for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Blocking and issue findings only.
    Minor,
    /// Balanced coverage.
    #[default]
    Medium,
    /// Everything including style, nits and long-term maintainability.
    Strict,
}

impl Precision {
    /// Maps the raw store value onto the enum. Unknown values fall back to
    /// `Medium` with a warning rather than failing the review.
    pub fn from_store(raw: &str) -> Self {
        match raw {
            "minor" => Precision::Minor,
            "medium" => Precision::Medium,
            "strict" => Precision::Strict,
            other => {
                if !other.is_empty() {
                    warn!(precision = other, "unknown precision value, using medium");
                }
                Precision::Medium
            }
        }
    }
}

/// Resolved review policy for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPolicy {
    pub name: String,
    pub precision: Precision,
    /// Free text appended to the end of the model prompt. Empty = none.
    pub custom_prompt: String,
}

/// Resolver over the configuration store.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    store: StoreClient,
}

impl ConfigResolver {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Builds the resolver from `CONFIG_STORE_URL` / `CONFIG_STORE_API_KEY`.
    pub fn from_env() -> StoreResult<Self> {
        let base_url = std::env::var("CONFIG_STORE_URL")
            .map_err(|_| StoreError::InvalidBaseUrl("CONFIG_STORE_URL not set".into()))?;
        let api_key = std::env::var("CONFIG_STORE_API_KEY").unwrap_or_default();
        Ok(Self::new(StoreClient::new(base_url, api_key)?))
    }

    /// Resolves the policy for `org/repo` under the given external
    /// installation id.
    ///
    /// Returns `Ok(None)` when any level of the walk has no row — the caller
    /// must treat that as "untracked, skip silently".
    pub async fn resolve_policy(
        &self,
        installation_id: i64,
        org_name: &str,
        repo_name: &str,
    ) -> StoreResult<Option<RepositoryPolicy>> {
        let Some(installation) = self
            .store
            .installation_by_external_id(installation_id)
            .await?
        else {
            debug!(installation_id, "installation not provisioned");
            return Ok(None);
        };

        let orgs = self
            .store
            .organizations_for_installation(installation.id)
            .await?;
        let Some(org) = select_organization(&orgs, org_name) else {
            debug!(installation_id, org = org_name, "organization not tracked");
            return Ok(None);
        };

        let rows = self.store.repositories_for_organization(org.id).await?;
        let Some(row) = select_repository(&rows, repo_name) else {
            debug!(org = org_name, repo = repo_name, "repository not tracked");
            return Ok(None);
        };

        Ok(Some(RepositoryPolicy {
            name: row.name.clone(),
            precision: Precision::from_store(&row.precision),
            custom_prompt: row.custom_prompt.clone(),
        }))
    }
}

/// Picks the organization row by exact name from one installation's rows.
/// No wildcard exists at this level.
fn select_organization<'a>(
    rows: &'a [OrganizationRow],
    org_name: &str,
) -> Option<&'a OrganizationRow> {
    rows.iter().find(|o| o.name == org_name)
}

/// Picks the repository row for `repo_name` from one organization's rows:
/// exact name match wins, then the `"*"` wildcard, then `"default"`.
fn select_repository<'a>(rows: &'a [RepositoryRow], repo_name: &str) -> Option<&'a RepositoryRow> {
    rows.iter()
        .find(|r| r.name == repo_name)
        .or_else(|| rows.iter().find(|r| r.name == "*"))
        .or_else(|| rows.iter().find(|r| r.name == "default"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, precision: &str) -> RepositoryRow {
        RepositoryRow {
            name: name.to_string(),
            precision: precision.to_string(),
            custom_prompt: String::new(),
        }
    }

    #[test]
    fn exact_match_beats_wildcard() {
        let rows = vec![row("*", "strict"), row("repoA", "minor")];
        let hit = select_repository(&rows, "repoA").unwrap();
        assert_eq!(hit.name, "repoA");
        assert_eq!(hit.precision, "minor");
    }

    #[test]
    fn wildcard_catches_unlisted_repository() {
        let rows = vec![row("repoA", "minor"), row("*", "strict")];
        let hit = select_repository(&rows, "repoB").unwrap();
        assert_eq!(hit.name, "*");
    }

    #[test]
    fn star_wildcard_is_preferred_over_default() {
        let rows = vec![row("default", "medium"), row("*", "strict")];
        let hit = select_repository(&rows, "anything").unwrap();
        assert_eq!(hit.name, "*");
    }

    #[test]
    fn default_sentinel_works_without_star() {
        let rows = vec![row("repoA", "minor"), row("default", "medium")];
        let hit = select_repository(&rows, "repoB").unwrap();
        assert_eq!(hit.name, "default");
    }

    #[test]
    fn no_match_means_untracked() {
        let rows = vec![row("repoA", "minor")];
        assert!(select_repository(&rows, "repoB").is_none());
        assert!(select_repository(&[], "repoA").is_none());
    }

    #[test]
    fn organization_selection_is_exact_and_scope_strict() {
        // The candidate set only ever contains one installation's rows; a
        // request naming a different organization must miss, never fall
        // through to another tenant's data.
        let rows = vec![
            OrganizationRow {
                id: 1,
                name: "orgX".into(),
            },
            OrganizationRow {
                id: 2,
                name: "orgZ".into(),
            },
        ];
        assert_eq!(select_organization(&rows, "orgX").map(|o| o.id), Some(1));
        assert!(select_organization(&rows, "orgY").is_none());
        // No wildcard semantics at the organization level.
        assert!(select_organization(&rows, "*").is_none());
    }

    #[test]
    fn precision_mapping_is_lenient() {
        assert_eq!(Precision::from_store("minor"), Precision::Minor);
        assert_eq!(Precision::from_store("medium"), Precision::Medium);
        assert_eq!(Precision::from_store("strict"), Precision::Strict);
        // Unknown and empty both degrade to the balanced default.
        assert_eq!(Precision::from_store("pedantic"), Precision::Medium);
        assert_eq!(Precision::from_store(""), Precision::Medium);
    }
}
