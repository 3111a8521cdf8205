//! Sentiment pipeline orchestration.

use tubemood_core::{AppConfig, ClassifyFailurePolicy};

use crate::classifier::{CotohaClassifier, SentimentClassifier};
use crate::comments::{CommentSource, YoutubeCommentSource};
use crate::error::SentimentError;
use crate::http::build_http_client;
use crate::retry::RetryPolicy;
use crate::token::TokenCache;
use crate::types::{ClassifiedRow, PipelineOutput, SentimentLabel, Tally};

/// Where a [`PipelineRunner`] currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Fetching,
    /// Classifying comment `index` (1-based) of `total`.
    Classifying { index: usize, total: usize },
    Done,
    Failed,
}

/// Drives one fetch followed by a sequential classify loop.
pub struct PipelineRunner<S, C> {
    source: S,
    classifier: C,
    policy: ClassifyFailurePolicy,
    state: PipelineState,
}

impl<S, C> PipelineRunner<S, C>
where
    S: CommentSource,
    C: SentimentClassifier,
{
    #[must_use]
    pub fn new(source: S, classifier: C) -> Self {
        Self {
            source,
            classifier,
            policy: ClassifyFailurePolicy::default(),
            state: PipelineState::Idle,
        }
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: ClassifyFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Fetch the comments for `content_id` and classify each in order.
    ///
    /// Every fetched comment yields exactly one row, indexed from 1, and the
    /// tally is recomputed from the finished rows. Nothing is returned on
    /// failure: the caller gets either the whole output or an error.
    ///
    /// # Errors
    ///
    /// - [`SentimentError::InvalidSource`] and other fetch errors.
    /// - [`SentimentError::InvalidCredentials`] from the classifier's token
    ///   exchange, under any failure policy.
    /// - [`SentimentError::ClassificationUnavailable`] under
    ///   [`ClassifyFailurePolicy::Abort`].
    pub async fn run(&mut self, content_id: &str) -> Result<PipelineOutput, SentimentError> {
        match self.execute(content_id).await {
            Ok(output) => {
                self.state = PipelineState::Done;
                tracing::info!(
                    content_id,
                    comments = output.rows.len(),
                    positive = output.tally.positive,
                    negative = output.tally.negative,
                    neutral = output.tally.neutral,
                    degraded = output.degraded,
                    "sentiment pipeline finished"
                );
                Ok(output)
            }
            Err(e) => {
                self.state = PipelineState::Failed;
                tracing::error!(content_id, error = %e, "sentiment pipeline failed");
                Err(e)
            }
        }
    }

    async fn execute(&mut self, content_id: &str) -> Result<PipelineOutput, SentimentError> {
        self.state = PipelineState::Fetching;
        let comments = self.source.fetch_comments(content_id).await?;

        if comments.is_empty() {
            tracing::info!(content_id, "no comments returned; empty report");
        }

        let total = comments.len();
        let mut rows = Vec::with_capacity(total);
        let mut degraded = 0usize;

        for (index, text) in (1..).zip(comments) {
            self.state = PipelineState::Classifying { index, total };
            tracing::debug!(index, total, "classifying comment");

            let label = match self.classifier.classify(&text).await {
                Ok(label) => label,
                Err(e @ SentimentError::ClassificationUnavailable(_))
                    if self.policy == ClassifyFailurePolicy::Neutral =>
                {
                    tracing::warn!(index, error = %e, "classification failed; recording as Neutral");
                    degraded += 1;
                    SentimentLabel::Neutral
                }
                Err(e) => return Err(e),
            };

            rows.push(ClassifiedRow { index, text, label });
        }

        let tally = Tally::from_rows(&rows);
        debug_assert_eq!(tally.total(), rows.len());

        Ok(PipelineOutput {
            content_id: content_id.trim().to_owned(),
            rows,
            tally,
            degraded,
        })
    }
}

/// Wire the production collaborators together from application config.
///
/// # Errors
///
/// Returns [`SentimentError::Http`] if the HTTP client cannot be built, or
/// [`SentimentError::InvalidBaseUrl`] for an unparseable endpoint URL.
pub fn build_runner(
    config: &AppConfig,
) -> Result<PipelineRunner<YoutubeCommentSource, CotohaClassifier>, SentimentError> {
    let client = build_http_client(config.request_timeout_secs, &config.user_agent)?;
    let credentials = &config.credentials;

    let source = YoutubeCommentSource::new(
        client.clone(),
        &config.youtube_base_url,
        &credentials.platform_api_key,
    )?;
    let tokens = TokenCache::new(
        client.clone(),
        &config.cotoha_auth_url,
        &credentials.classifier_client_id,
        &credentials.classifier_client_secret,
    )?;
    let classifier = CotohaClassifier::new(
        client,
        &config.cotoha_api_base_url,
        tokens,
        RetryPolicy::new(config.classify_max_retries, config.classify_backoff_base_ms),
    )?;

    Ok(PipelineRunner::new(source, classifier).with_failure_policy(config.on_classify_error))
}
