use std::str::FromStr;

/// What the pipeline does when a single comment cannot be classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassifyFailurePolicy {
    /// Fail the whole run; no partial report.
    #[default]
    Abort,
    /// Record the comment as Neutral and keep going.
    Neutral,
}

impl std::fmt::Display for ClassifyFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyFailurePolicy::Abort => write!(f, "abort"),
            ClassifyFailurePolicy::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for ClassifyFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!(
                "unknown policy '{other}' (expected 'abort' or 'neutral')"
            )),
        }
    }
}

/// Secrets for the comment platform and the classification service.
///
/// Supplied once at startup and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub platform_api_key: String,
    pub classifier_client_id: String,
    pub classifier_client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("platform_api_key", &"[redacted]")
            .field("classifier_client_id", &self.classifier_client_id)
            .field("classifier_client_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub log_level: String,
    pub youtube_base_url: String,
    pub cotoha_auth_url: String,
    pub cotoha_api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub classify_max_retries: u32,
    pub classify_backoff_base_ms: u64,
    pub on_classify_error: ClassifyFailurePolicy,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("credentials", &self.credentials)
            .field("log_level", &self.log_level)
            .field("youtube_base_url", &self.youtube_base_url)
            .field("cotoha_auth_url", &self.cotoha_auth_url)
            .field("cotoha_api_base_url", &self.cotoha_api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("classify_max_retries", &self.classify_max_retries)
            .field("classify_backoff_base_ms", &self.classify_backoff_base_ms)
            .field("on_classify_error", &self.on_classify_error)
            .finish()
    }
}
