use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    /// The classifier's auth endpoint did not hand out an access token.
    #[error("invalid classifier credentials: {0}")]
    InvalidCredentials(String),

    /// The comment platform rejected the API key or the content id.
    #[error("invalid comment source for '{content_id}': {reason}")]
    InvalidSource { content_id: String, reason: String },

    /// One comment could not be classified.
    #[error("classification unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("unexpected HTTP status {status} from {service}")]
    UnexpectedStatus { service: &'static str, status: u16 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl SentimentError {
    /// Returns `true` for errors that end the whole run.
    ///
    /// Only [`SentimentError::ClassificationUnavailable`] is scoped to a
    /// single comment; the pipeline's failure policy decides what to do with it.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SentimentError::ClassificationUnavailable(_))
    }
}
