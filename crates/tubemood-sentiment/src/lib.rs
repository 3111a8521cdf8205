//! Comment sentiment pipeline for tubemood.
//!
//! Fetches the first page of top-level comments for a video, classifies each
//! one through the COTOHA sentiment API (client-credentials OAuth, cached
//! bearer token) and aggregates the labels into report-ready rows and counts.

pub mod classifier;
pub mod comments;
pub mod error;
pub mod pipeline;
pub mod retry;
pub mod token;
pub mod types;

mod http;

pub use classifier::{CotohaClassifier, SentimentClassifier};
pub use comments::{CommentSource, YoutubeCommentSource, PAGE_SIZE};
pub use error::SentimentError;
pub use http::build_http_client;
pub use pipeline::{build_runner, PipelineRunner, PipelineState};
pub use retry::RetryPolicy;
pub use token::{AccessToken, TokenCache};
pub use types::{ClassifiedRow, PipelineOutput, SentimentLabel, Tally};
pub use tubemood_core::ClassifyFailurePolicy;
