//! Bearer-token cache for the COTOHA API (client-credentials OAuth).

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Holds at most one access token and fetches a new one on demand.
///
/// The service does not tell us when a token expires, so a cached token is
/// used until a caller sees it rejected and calls [`TokenCache::invalidate`].
/// Single owner, no locking.
pub struct TokenCache {
    client: Client,
    auth_url: Url,
    client_id: String,
    client_secret: String,
    token: Option<AccessToken>,
}

impl TokenCache {
    /// Creates an empty cache. No network traffic happens until the first
    /// [`TokenCache::get_token`].
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::InvalidBaseUrl`] if `auth_url` does not parse.
    pub fn new(
        client: Client,
        auth_url: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self, SentimentError> {
        let auth_url = Url::parse(auth_url).map_err(|e| SentimentError::InvalidBaseUrl {
            url: auth_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            auth_url,
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            token: None,
        })
    }

    /// Returns the cached token, exchanging client credentials for a new one
    /// if the cache is empty.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::InvalidCredentials`] if the auth endpoint answers
    ///   with a non-2xx status or a body without an `access_token`. Not retried.
    /// - [`SentimentError::Http`] on network failure.
    pub async fn get_token(&mut self) -> Result<AccessToken, SentimentError> {
        if let Some(token) = &self.token {
            return Ok(token.clone());
        }

        let token = self.fetch_token().await?;
        self.token = Some(token.clone());
        Ok(token)
    }

    /// Drops the cached token so the next [`TokenCache::get_token`]
    /// re-authenticates.
    pub fn invalidate(&mut self) {
        if self.token.take().is_some() {
            tracing::debug!("cached COTOHA access token invalidated");
        }
    }

    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.token.is_some()
    }

    async fn fetch_token(&self) -> Result<AccessToken, SentimentError> {
        let request = TokenRequest {
            grant_type: "client_credentials",
            client_id: &self.client_id,
            client_secret: &self.client_secret,
        };

        let response = self
            .client
            .post(self.auth_url.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::InvalidCredentials(format!(
                "token exchange failed with status {status}"
            )));
        }

        let body = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            SentimentError::InvalidCredentials(format!("token response parse error: {e}"))
        })?;

        match parsed.access_token {
            Some(token) if !token.is_empty() => {
                tracing::debug!("obtained COTOHA access token");
                Ok(AccessToken(token))
            }
            _ => Err(SentimentError::InvalidCredentials(
                "token response has no access_token".to_owned(),
            )),
        }
    }
}
