//! Integration tests for `YoutubeCommentSource` using wiremock HTTP mocks.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tubemood_sentiment::{
    build_http_client, CommentSource, SentimentError, YoutubeCommentSource, PAGE_SIZE,
};

fn test_source(server: &MockServer) -> YoutubeCommentSource {
    let client = build_http_client(5, "tubemood-test/0.1").expect("client should build");
    YoutubeCommentSource::new(client, &server.uri(), "test-key")
        .expect("source construction should not fail")
}

fn thread(text: &str) -> serde_json::Value {
    json!({
        "kind": "youtube#commentThread",
        "snippet": {
            "videoId": "vid123",
            "topLevelComment": {
                "kind": "youtube#comment",
                "snippet": { "textDisplay": text, "likeCount": 0 }
            },
            "totalReplyCount": 0
        }
    })
}

#[tokio::test]
async fn fetches_top_level_comments_in_platform_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("part", "snippet"))
        .and(query_param("videoId", "vid123"))
        .and(query_param("textFormat", "plainText"))
        .and(query_param("maxResults", "100"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "youtube#commentThreadListResponse",
            "nextPageToken": "ignored",
            "items": [thread("third"), thread("first"), thread("second")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let comments = test_source(&server)
        .fetch_comments("vid123")
        .await
        .expect("should parse comments");

    assert_eq!(comments, vec!["third", "first", "second"]);
}

#[tokio::test]
async fn threads_without_display_text_are_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [thread("kept"), { "snippet": {} }, thread("also kept")]
        })))
        .mount(&server)
        .await;

    let comments = test_source(&server).fetch_comments("vid123").await.unwrap();

    assert_eq!(comments, vec!["kept", "also kept"]);
}

#[tokio::test]
async fn response_without_items_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kind": "youtube#commentThreadListResponse"
        })))
        .mount(&server)
        .await;

    let comments = test_source(&server).fetch_comments("vid123").await.unwrap();

    assert!(comments.is_empty());
}

#[tokio::test]
async fn oversized_page_is_truncated() {
    let server = MockServer::start().await;
    let items: Vec<_> = (0..PAGE_SIZE + 5).map(|i| thread(&format!("c{i}"))).collect();

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(&server)
        .await;

    let comments = test_source(&server).fetch_comments("vid123").await.unwrap();

    assert_eq!(comments.len(), PAGE_SIZE);
    assert_eq!(comments[0], "c0");
}

#[tokio::test]
async fn bad_api_key_is_invalid_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "errors": [{ "reason": "badRequest" }]
            }
        })))
        .mount(&server)
        .await;

    let err = test_source(&server).fetch_comments("vid123").await.unwrap_err();

    match err {
        SentimentError::InvalidSource { content_id, reason } => {
            assert_eq!(content_id, "vid123");
            assert!(reason.contains("API key not valid"), "reason: {reason}");
            assert!(reason.starts_with("HTTP 400"), "reason: {reason}");
        }
        other => panic!("expected InvalidSource, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_video_is_invalid_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_source(&server).fetch_comments("missing").await.unwrap_err();

    assert!(matches!(err, SentimentError::InvalidSource { .. }), "{err:?}");
    assert!(err.is_fatal());
}

#[tokio::test]
async fn comments_disabled_is_invalid_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "The video has disabled comments." }
        })))
        .mount(&server)
        .await;

    let err = test_source(&server).fetch_comments("vid123").await.unwrap_err();

    assert!(
        matches!(err, SentimentError::InvalidSource { ref reason, .. } if reason.contains("disabled comments")),
        "{err:?}"
    );
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_source(&server).fetch_comments("vid123").await.unwrap_err();

    assert!(
        matches!(err, SentimentError::UnexpectedStatus { status: 503, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn blank_content_id_is_rejected_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_source(&server).fetch_comments("   ").await.unwrap_err();

    assert!(matches!(err, SentimentError::InvalidSource { .. }), "{err:?}");
}
