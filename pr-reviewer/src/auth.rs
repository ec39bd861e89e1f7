//! GitHub credential strategy: App installation tokens or a static PAT.
//!
//! The variant is selected once at startup from configuration presence:
//! - `GITHUB_APP_ID` + `GITHUB_APP_PRIVATE_KEY_PATH` set → App variant, which
//!   mints a short-lived installation-scoped token per review.
//! - otherwise → static `GITHUB_TOKEN`.
//!
//! Once the App variant is selected, a failure while minting (bad key,
//! signing failure, rejected exchange) aborts the review for that PR — it is
//! never silently downgraded to the static token at review time.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AuthError, ConfigError, PrResult, ProviderError};

/// Lifetime of the signed app assertion. GitHub caps this at 10 minutes.
const ASSERTION_TTL_SECS: i64 = 600;

/// Two-variant credential strategy (enum-dispatch, no trait objects).
#[derive(Clone)]
pub enum GithubAuth {
    /// GitHub App: exchange a signed assertion for an installation token.
    App(GithubAppAuth),
    /// Static personal access token configured at startup.
    Token(String),
}

impl GithubAuth {
    /// Selects the strategy from the environment.
    pub fn from_env() -> PrResult<Self> {
        let app_id = std::env::var("GITHUB_APP_ID").ok();
        let key_path = std::env::var("GITHUB_APP_PRIVATE_KEY_PATH").ok();

        if let (Some(app_id), Some(key_path)) = (app_id, key_path) {
            let app_id: u64 = app_id.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "GITHUB_APP_ID",
                value: app_id.clone(),
            })?;
            return Ok(GithubAuth::App(GithubAppAuth::from_pem_file(
                app_id, &key_path,
            )?));
        }

        let token = std::env::var("GITHUB_TOKEN")
            .map_err(|_| ConfigError::MissingEnv("GITHUB_TOKEN"))?;
        Ok(GithubAuth::Token(token))
    }

    /// Resolves the credential for one review.
    ///
    /// The App variant requires an installation id from the webhook payload;
    /// the static variant ignores it.
    pub async fn credential(&self, base_api: &str, installation_id: i64) -> PrResult<String> {
        match self {
            GithubAuth::App(app) => app.installation_token(base_api, installation_id).await,
            GithubAuth::Token(token) => Ok(token.clone()),
        }
    }
}

/// RS256 signer bound to one GitHub App.
#[derive(Clone)]
pub struct GithubAppAuth {
    app_id: u64,
    key: EncodingKey,
    http: Client,
}

/// Registered claims of the app assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

impl GithubAppAuth {
    /// Loads and parses the RSA private key from a PEM file.
    pub fn from_pem_file(app_id: u64, key_path: &str) -> Result<Self, AuthError> {
        let pem = std::fs::read(key_path)?;
        let key = EncodingKey::from_rsa_pem(&pem)?;
        let http = Client::builder()
            .user_agent("gale-backend/0.1")
            .build()
            .expect("http client");
        Ok(Self { app_id, key, http })
    }

    /// Signs a fresh app assertion: issuer = app id, valid for 10 minutes.
    fn sign_assertion(&self) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
            iss: self.app_id.to_string(),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.key,
        )?)
    }

    /// Exchanges the assertion for an installation-scoped access token.
    pub async fn installation_token(
        &self,
        base_api: &str,
        installation_id: i64,
    ) -> PrResult<String> {
        let assertion = self.sign_assertion().map_err(crate::errors::Error::Auth)?;

        let url = format!(
            "{}/app/installations/{}/access_tokens",
            base_api.trim_end_matches('/'),
            installation_id
        );
        debug!(installation_id, "minting installation token");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&assertion)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Exchange(status.as_u16()).into());
        }

        let out: InstallationTokenResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(out.token)
    }
}

#[derive(Debug, Deserialize)]
struct InstallationTokenResponse {
    token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_claims_cover_ten_minutes() {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
            iss: "12345".to_string(),
        };
        assert_eq!(claims.exp - claims.iat, 600);
        assert_eq!(claims.iss, "12345");
        // Serialized shape is what GitHub expects: numeric iat/exp, string iss.
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json["iat"].is_i64());
        assert!(json["exp"].is_i64());
        assert!(json["iss"].is_string());
    }
}
