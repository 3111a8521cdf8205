use crate::app_config::{AppConfig, ClassifyFailurePolicy, Credentials};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // Blank secrets are as useless as absent ones.
    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let credentials = Credentials {
        platform_api_key: require("YOUTUBE_API_KEY")?,
        classifier_client_id: require("COTOHA_CLIENT_ID")?,
        classifier_client_secret: require("COTOHA_CLIENT_SECRET")?,
    };

    let log_level = or_default("TUBEMOOD_LOG_LEVEL", "info");
    let youtube_base_url = or_default(
        "TUBEMOOD_YOUTUBE_BASE_URL",
        "https://www.googleapis.com/youtube/v3",
    );
    let cotoha_auth_url = or_default(
        "TUBEMOOD_COTOHA_AUTH_URL",
        "https://api.ce-cotoha.com/v1/oauth/accesstokens",
    );
    let cotoha_api_base_url = or_default(
        "TUBEMOOD_COTOHA_API_BASE_URL",
        "https://api.ce-cotoha.com/api/dev/nlp",
    );

    let request_timeout_secs = parse_u64("TUBEMOOD_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TUBEMOOD_USER_AGENT", "tubemood/0.1 (comment-sentiment)");
    let classify_max_retries = parse_u32("TUBEMOOD_CLASSIFY_MAX_RETRIES", "0")?;
    let classify_backoff_base_ms = parse_u64("TUBEMOOD_CLASSIFY_BACKOFF_BASE_MS", "1000")?;
    let on_classify_error = parse_policy(&or_default("TUBEMOOD_ON_CLASSIFY_ERROR", "abort"))?;

    Ok(AppConfig {
        credentials,
        log_level,
        youtube_base_url,
        cotoha_auth_url,
        cotoha_api_base_url,
        request_timeout_secs,
        user_agent,
        classify_max_retries,
        classify_backoff_base_ms,
        on_classify_error,
    })
}

fn parse_policy(s: &str) -> Result<ClassifyFailurePolicy, ConfigError> {
    s.parse().map_err(|reason| ConfigError::InvalidEnvVar {
        var: "TUBEMOOD_ON_CLASSIFY_ERROR".to_string(),
        reason,
    })
}
