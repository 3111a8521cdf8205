use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::SentimentError;

/// Builds the shared HTTP client used by every external collaborator.
///
/// `timeout_secs` applies per request, not to a whole pipeline run.
///
/// # Errors
///
/// Returns [`SentimentError::Http`] if the underlying `reqwest::Client`
/// cannot be constructed.
pub fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, SentimentError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Joins `path` onto `base`, tolerating a trailing slash on the base.
pub(crate) fn endpoint_url(base: &str, path: &str) -> Result<Url, SentimentError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| SentimentError::InvalidBaseUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })
}
