//! Top-level comment retrieval from the YouTube Data API v3.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::SentimentError;
use crate::http::endpoint_url;

/// Maximum number of comments fetched per run. Only the first page is read.
pub const PAGE_SIZE: usize = 100;

/// Anything that can hand back the comments for a piece of content.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Returns up to [`PAGE_SIZE`] comment texts in platform order.
    async fn fetch_comments(&self, content_id: &str) -> Result<Vec<String>, SentimentError>;
}

#[derive(Debug, Deserialize)]
struct CommentThreadList {
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: Option<ThreadSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreadSnippet {
    top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentSnippet {
    text_display: Option<String>,
}

impl CommentThread {
    fn into_text(self) -> Option<String> {
        self.snippet?.top_level_comment?.snippet?.text_display
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// `commentThreads.list` client authenticated with a static API key.
pub struct YoutubeCommentSource {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl YoutubeCommentSource {
    /// `base_url` is the API root, e.g. `https://www.googleapis.com/youtube/v3`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Result<Self, SentimentError> {
        Ok(Self {
            client,
            endpoint: endpoint_url(base_url, "commentThreads")?,
            api_key: api_key.to_owned(),
        })
    }

    fn build_url(&self, content_id: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("videoId", content_id)
            .append_pair("textFormat", "plainText")
            .append_pair("maxResults", &PAGE_SIZE.to_string())
            .append_pair("key", &self.api_key);
        url
    }
}

#[async_trait]
impl CommentSource for YoutubeCommentSource {
    /// # Errors
    ///
    /// - [`SentimentError::InvalidSource`] for a blank content id or an
    ///   HTTP 400/401/403/404 answer (bad API key, unknown or private video).
    /// - [`SentimentError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`SentimentError::Deserialize`] if the listing is not valid JSON.
    /// - [`SentimentError::Http`] on network failure.
    async fn fetch_comments(&self, content_id: &str) -> Result<Vec<String>, SentimentError> {
        let content_id = content_id.trim();
        if content_id.is_empty() {
            return Err(SentimentError::InvalidSource {
                content_id: String::new(),
                reason: "content id is empty".to_owned(),
            });
        }

        let response = self.client.get(self.build_url(content_id)).send().await?;
        let status = response.status();

        if matches!(status.as_u16(), 400 | 401 | 403 | 404) {
            let body = response.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error.message)
            {
                Some(message) => format!("HTTP {}: {message}", status.as_u16()),
                None => format!("HTTP {}", status.as_u16()),
            };
            return Err(SentimentError::InvalidSource {
                content_id: content_id.to_owned(),
                reason,
            });
        }

        if !status.is_success() {
            return Err(SentimentError::UnexpectedStatus {
                service: "youtube commentThreads",
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let listing: CommentThreadList =
            serde_json::from_str(&body).map_err(|e| SentimentError::Deserialize {
                context: format!("commentThreads(videoId={content_id})"),
                source: e,
            })?;

        let item_count = listing.items.len();
        let comments: Vec<String> = listing
            .items
            .into_iter()
            .filter_map(CommentThread::into_text)
            .take(PAGE_SIZE)
            .collect();

        if comments.len() < item_count.min(PAGE_SIZE) {
            tracing::debug!(
                content_id,
                items = item_count,
                kept = comments.len(),
                "skipped comment threads without display text"
            );
        }

        tracing::info!(content_id, count = comments.len(), "fetched comments");
        Ok(comments)
    }
}
