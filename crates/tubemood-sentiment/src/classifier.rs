//! COTOHA sentiment classification, one comment per request.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::error::SentimentError;
use crate::http::endpoint_url;
use crate::retry::{is_retriable, RetryPolicy};
use crate::token::{AccessToken, TokenCache};
use crate::types::SentimentLabel;

/// Anything that can label one comment.
#[async_trait]
pub trait SentimentClassifier: Send {
    /// Classifies one comment.
    ///
    /// Errors other than [`SentimentError::ClassificationUnavailable`] are
    /// fatal for the run.
    async fn classify(&mut self, text: &str) -> Result<SentimentLabel, SentimentError>;
}

#[derive(Serialize)]
struct SentimentRequest<'a> {
    sentence: &'a str,
}

/// Client for COTOHA's `v1/sentiment` endpoint.
///
/// Owns the [`TokenCache`]; a 401 from the endpoint invalidates the cached
/// token and re-sends the comment once with a fresh one.
pub struct CotohaClassifier {
    client: Client,
    endpoint: Url,
    tokens: TokenCache,
    retry: RetryPolicy,
}

impl CotohaClassifier {
    /// `api_base_url` is the NLP API root, e.g. `https://api.ce-cotoha.com/api/dev/nlp`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::InvalidBaseUrl`] if `api_base_url` does not parse.
    pub fn new(
        client: Client,
        api_base_url: &str,
        tokens: TokenCache,
        retry: RetryPolicy,
    ) -> Result<Self, SentimentError> {
        Ok(Self {
            client,
            endpoint: endpoint_url(api_base_url, "v1/sentiment")?,
            tokens,
            retry,
        })
    }

    async fn send(&self, token: &AccessToken, text: &str) -> Result<SentimentLabel, SentimentError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(token.as_str())
            .json(&SentimentRequest { sentence: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::UnexpectedStatus {
                service: "cotoha sentiment",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| SentimentError::Deserialize {
                context: "cotoha sentiment response".to_owned(),
                source: e,
            })?;

        let raw = value
            .pointer("/result/sentiment")
            .and_then(serde_json::Value::as_str);
        Ok(SentimentLabel::from_raw(raw))
    }
}

#[async_trait]
impl SentimentClassifier for CotohaClassifier {
    /// # Errors
    ///
    /// - [`SentimentError::InvalidCredentials`] / [`SentimentError::Http`]
    ///   from the token exchange (fatal).
    /// - [`SentimentError::ClassificationUnavailable`] when the request fails
    ///   after the retry budget, or the endpoint rejects a freshly issued token.
    async fn classify(&mut self, text: &str) -> Result<SentimentLabel, SentimentError> {
        let mut attempt = 0u32;
        let mut refreshed = false;

        loop {
            let token = self.tokens.get_token().await?;

            match self.send(&token, text).await {
                Ok(label) => return Ok(label),
                Err(SentimentError::UnexpectedStatus { status, .. })
                    if status == StatusCode::UNAUTHORIZED.as_u16() && !refreshed =>
                {
                    tracing::info!("COTOHA rejected bearer token; re-authenticating");
                    self.tokens.invalidate();
                    refreshed = true;
                }
                Err(err) if is_retriable(&err) && attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.retry.max_retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient classification error; retrying after back-off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    return Err(SentimentError::ClassificationUnavailable(err.to_string()));
                }
            }
        }
    }
}
