use std::time::Duration;

use analysis_client::{AnalysisClient, AnalyzeRequestBody, ClientError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VIDEO: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn every_section() -> AnalyzeRequestBody {
    AnalyzeRequestBody {
        video_url: VIDEO.to_string(),
        include_comments: true,
        include_sentiment: true,
        include_topics: true,
        include_keywords: true,
    }
}

#[tokio::test]
async fn posts_full_request_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(header("authorization", "Bearer secret"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "video_url": VIDEO,
            "include_comments": true,
            "include_sentiment": true,
            "include_topics": true,
            "include_keywords": true,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "video_info": { "title": "X" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AnalysisClient::new(&server.uri(), "secret").unwrap();
    let payload = client.analyze(&every_section()).await.unwrap();

    assert_eq!(payload["video_info"]["title"], "X");
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(&format!("{}/", server.uri()), "k").unwrap();
    assert_eq!(client.base_url(), server.uri());

    let payload = client.analyze(&every_section()).await.unwrap();
    assert!(payload.as_object().unwrap().is_empty());
}

#[tokio::test]
async fn non_success_status_surfaces_code_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(503).set_body_string("service down"))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(&server.uri(), "k").unwrap();
    let err = client.analyze(&every_section()).await.unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "service down");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(&server.uri(), "k").unwrap();
    let err = client.analyze(&every_section()).await.unwrap_err();

    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client =
        AnalysisClient::with_timeout(&server.uri(), "k", Duration::from_millis(50)).unwrap();
    let err = client.analyze(&every_section()).await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout(_)));
    assert!(err.to_string().starts_with("Request timed out"));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    // Port 9 (discard) on localhost is essentially never listening.
    let client = AnalysisClient::new("http://127.0.0.1:9", "k").unwrap();
    let err = client.analyze(&every_section()).await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
    assert!(err.to_string().contains("could not connect"));
}
