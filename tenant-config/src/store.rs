//! PostgREST-style read-only client for the tenant configuration store.
//!
//! Every lookup is a `GET /rest/v1/<table>?<filters>` returning a JSON array
//! of rows. The store is authenticated with an API key sent both as `apikey`
//! and as a bearer token.

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{StoreError, StoreResult};

/// Thin HTTP client over the configuration store.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base_url: String, // e.g. "https://config.example.dev"
    api_key: String,
}

/// Installation row: binds an external GitHub App installation id to the
/// internal row id that scopes organizations.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallationRow {
    pub id: i64,
    pub installation_id: i64,
}

/// Organization row, scoped to an installation.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationRow {
    pub id: i64,
    pub name: String,
}

/// Repository row, scoped to an organization. `precision` stays a raw string
/// here; mapping to the enum happens in the resolver.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRow {
    pub name: String,
    #[serde(default)]
    pub precision: String,
    #[serde(default)]
    pub custom_prompt: String,
}

impl StoreClient {
    /// Builds a client from base URL + API key.
    pub fn new(base_url: String, api_key: String) -> StoreResult<Self> {
        let trimmed = base_url.trim_end_matches('/');
        if trimmed.is_empty() || !(trimmed.starts_with("http://") || trimmed.starts_with("https://"))
        {
            return Err(StoreError::InvalidBaseUrl(base_url));
        }
        let http = Client::builder().user_agent("gale-backend/0.1").build()?;
        Ok(Self {
            http,
            base_url: trimmed.to_string(),
            api_key,
        })
    }

    /// Looks up the installation row by its external GitHub installation id.
    pub async fn installation_by_external_id(
        &self,
        installation_id: i64,
    ) -> StoreResult<Option<InstallationRow>> {
        let rows: Vec<InstallationRow> = self
            .get_rows(
                "/rest/v1/installation",
                &format!("installation_id=eq.{installation_id}"),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Fetches all organization rows inside one installation scope.
    ///
    /// `installation_db_id` is the INTERNAL row id, not the external GitHub
    /// installation id — organization names are only unique per installation,
    /// so rows from other installations must never enter the candidate set.
    pub async fn organizations_for_installation(
        &self,
        installation_db_id: i64,
    ) -> StoreResult<Vec<OrganizationRow>> {
        self.get_rows(
            "/rest/v1/organization",
            &format!("installation_id=eq.{installation_db_id}"),
        )
        .await
    }

    /// Fetches all repository rows for one organization scope.
    ///
    /// Exact/wildcard selection happens in the resolver so it stays a pure,
    /// testable function.
    pub async fn repositories_for_organization(
        &self,
        organization_id: i64,
    ) -> StoreResult<Vec<RepositoryRow>> {
        self.get_rows(
            "/rest/v1/repository",
            &format!("organization_id=eq.{organization_id}"),
        )
        .await
    }

    /// Shared GET helper: builds the URL, attaches auth headers, decodes rows.
    async fn get_rows<T: DeserializeOwned>(&self, path: &str, query: &str) -> StoreResult<Vec<T>> {
        let url = format!("{}{}?{}", self.base_url, path, query);
        debug!(%url, "store lookup");

        let resp = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StoreError::Status(status.as_u16()));
        }

        Ok(resp.json().await?)
    }
}
