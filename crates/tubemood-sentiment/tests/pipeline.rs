//! End-to-end pipeline tests: comment listing, token exchange and sentiment
//! calls all served by one wiremock server.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tubemood_core::{AppConfig, ClassifyFailurePolicy, Credentials};
use tubemood_sentiment::{
    build_runner, ClassifiedRow, PipelineState, SentimentError, SentimentLabel, Tally,
};

fn test_config(server: &MockServer, policy: ClassifyFailurePolicy) -> AppConfig {
    AppConfig {
        credentials: Credentials {
            platform_api_key: "yt-key".to_owned(),
            classifier_client_id: "cotoha-id".to_owned(),
            classifier_client_secret: "cotoha-secret".to_owned(),
        },
        log_level: "debug".to_owned(),
        youtube_base_url: format!("{}/youtube/v3", server.uri()),
        cotoha_auth_url: format!("{}/v1/oauth/accesstokens", server.uri()),
        cotoha_api_base_url: format!("{}/api/dev/nlp", server.uri()),
        request_timeout_secs: 5,
        user_agent: "tubemood-test/0.1".to_owned(),
        classify_max_retries: 0,
        classify_backoff_base_ms: 0,
        on_classify_error: policy,
    }
}

async fn mount_comments(server: &MockServer, texts: &[&str]) {
    let items: Vec<_> = texts
        .iter()
        .map(|t| json!({ "snippet": { "topLevelComment": { "snippet": { "textDisplay": t } } } }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/youtube/v3/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/oauth/accesstokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok" })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_sentiment(server: &MockServer, sentence: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/dev/nlp/v1/sentiment"))
        .and(body_json(json!({ "sentence": sentence })))
        .respond_with(response)
        .mount(server)
        .await;
}

fn sentiment(raw: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": { "sentiment": raw } }))
}

#[tokio::test]
async fn classifies_every_comment_with_one_token_exchange() {
    let server = MockServer::start().await;
    mount_comments(&server, &["c1", "c2", "c3"]).await;
    mount_token(&server, 1).await;
    mount_sentiment(&server, "c1", sentiment("Positive")).await;
    mount_sentiment(&server, "c2", sentiment("Negative")).await;
    mount_sentiment(&server, "c3", sentiment("Positive")).await;

    let mut runner = build_runner(&test_config(&server, ClassifyFailurePolicy::Abort)).unwrap();
    let output = runner.run("vid123").await.expect("run should succeed");

    let expected = [
        (1, "c1", SentimentLabel::Positive),
        (2, "c2", SentimentLabel::Negative),
        (3, "c3", SentimentLabel::Positive),
    ]
    .into_iter()
    .map(|(index, text, label)| ClassifiedRow {
        index,
        text: text.to_owned(),
        label,
    })
    .collect::<Vec<_>>();

    assert_eq!(output.content_id, "vid123");
    assert_eq!(output.rows, expected);
    assert_eq!(
        output.tally,
        Tally {
            positive: 2,
            negative: 1,
            neutral: 0
        }
    );
    assert_eq!(output.tally.total(), output.rows.len());
    assert_eq!(runner.state(), PipelineState::Done);
}

#[tokio::test]
async fn platform_auth_error_is_invalid_source_with_no_classification() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/youtube/v3/commentThreads"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "The request is not properly authorized." }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_token(&server, 0).await;

    let mut runner = build_runner(&test_config(&server, ClassifyFailurePolicy::Abort)).unwrap();
    let err = runner.run("vid123").await.unwrap_err();

    assert!(matches!(err, SentimentError::InvalidSource { .. }), "{err:?}");
    assert_eq!(runner.state(), PipelineState::Failed);
}

#[tokio::test]
async fn invalid_classifier_credentials_abort_the_run() {
    let server = MockServer::start().await;
    mount_comments(&server, &["c1", "c2"]).await;

    Mock::given(method("POST"))
        .and(path("/v1/oauth/accesstokens"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let mut runner = build_runner(&test_config(&server, ClassifyFailurePolicy::Neutral)).unwrap();
    let err = runner.run("vid123").await.unwrap_err();

    assert!(matches!(err, SentimentError::InvalidCredentials(_)), "{err:?}");
    assert_eq!(runner.state(), PipelineState::Failed);
}

#[tokio::test]
async fn quota_error_aborts_under_abort_policy() {
    let server = MockServer::start().await;
    mount_comments(&server, &["c1", "c2", "c3"]).await;
    mount_token(&server, 1).await;
    mount_sentiment(&server, "c1", sentiment("Positive")).await;
    mount_sentiment(&server, "c2", ResponseTemplate::new(429)).await;
    mount_sentiment(&server, "c3", sentiment("Positive")).await;

    let mut runner = build_runner(&test_config(&server, ClassifyFailurePolicy::Abort)).unwrap();
    let err = runner.run("vid123").await.unwrap_err();

    assert!(
        matches!(err, SentimentError::ClassificationUnavailable(_)),
        "{err:?}"
    );
}

#[tokio::test]
async fn quota_error_degrades_row_under_neutral_policy() {
    let server = MockServer::start().await;
    mount_comments(&server, &["c1", "c2", "c3"]).await;
    mount_token(&server, 1).await;
    mount_sentiment(&server, "c1", sentiment("Negative")).await;
    mount_sentiment(&server, "c2", ResponseTemplate::new(429)).await;
    mount_sentiment(&server, "c3", sentiment("Positive")).await;

    let mut runner = build_runner(&test_config(&server, ClassifyFailurePolicy::Neutral)).unwrap();
    let output = runner.run("vid123").await.unwrap();

    assert_eq!(output.rows.len(), 3);
    assert_eq!(output.rows[1].label, SentimentLabel::Neutral);
    assert_eq!(output.degraded, 1);
    assert_eq!(
        output.tally,
        Tally {
            positive: 1,
            negative: 1,
            neutral: 1
        }
    );
}

#[tokio::test]
async fn video_without_comments_skips_token_exchange() {
    let server = MockServer::start().await;
    mount_comments(&server, &[]).await;
    mount_token(&server, 0).await;

    let mut runner = build_runner(&test_config(&server, ClassifyFailurePolicy::Abort)).unwrap();
    let output = runner.run("vid123").await.unwrap();

    assert!(output.rows.is_empty());
    assert_eq!(output.tally.total(), 0);
}
