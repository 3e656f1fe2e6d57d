use std::time::Duration;

use iframist_core::{ScrapeResult, CONNECT_FAILURE_MESSAGE, UNKNOWN_ERROR_MESSAGE};
use iframist_engine::{
    ClientSettings, ReqwestScrapeClient, ScrapeClient, ScrapeRequest, TransportKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Base URL of a local port that nothing listens on.
fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

fn client_for(server: &MockServer) -> ReqwestScrapeClient {
    ReqwestScrapeClient::new(&server.uri(), ClientSettings::default()).expect("client")
}

#[tokio::test]
async fn posts_json_payload_and_returns_items() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "url": "example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "iframes": ["https://a.com", "https://b.com"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .perform_request(&ScrapeRequest::new("example.com"))
        .await;

    assert_eq!(
        result,
        ScrapeResult::success(
            vec!["https://a.com".to_string(), "https://b.com".to_string()],
            None
        )
    );
}

#[tokio::test]
async fn empty_list_keeps_payload_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "iframes": [],
            "message": "Page renders frames with JavaScript."
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .perform_request(&ScrapeRequest::new("example.com"))
        .await;

    assert_eq!(
        result,
        ScrapeResult::success(
            Vec::new(),
            Some("Page renders frames with JavaScript.".to_string())
        )
    );
}

#[tokio::test]
async fn failure_status_uses_error_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "blocked" })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .perform_request(&ScrapeRequest::new("example.com"))
        .await;

    assert_eq!(result, ScrapeResult::Failure("blocked".to_string()));
}

#[tokio::test]
async fn failure_status_without_error_field_is_generic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .perform_request(&ScrapeRequest::new("example.com"))
        .await;

    assert_eq!(
        result,
        ScrapeResult::Failure(UNKNOWN_ERROR_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn unreachable_server_is_transport_failure() {
    let uri = closed_port_uri();
    let client = ReqwestScrapeClient::new(&uri, ClientSettings::default()).expect("client");
    let err = client
        .try_perform(&ScrapeRequest::new("example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, TransportKind::Network);

    let result = client.perform_request(&ScrapeRequest::new("example.com")).await;
    assert_eq!(
        result,
        ScrapeResult::Failure(CONNECT_FAILURE_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "iframes": ["https://late.com"] })),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        request_timeout: Duration::from_millis(50),
        ..ClientSettings::default()
    };
    let client = ReqwestScrapeClient::new(&server.uri(), settings).expect("client");

    let err = client
        .try_perform(&ScrapeRequest::new("example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, TransportKind::Timeout);
}

#[tokio::test]
async fn oversized_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"iframes":["https://a.com","https://b.com","https://c.com"]}"#,
        ))
        .mount(&server)
        .await;

    let settings = ClientSettings {
        max_response_bytes: 16,
        ..ClientSettings::default()
    };
    let client = ReqwestScrapeClient::new(&server.uri(), settings).expect("client");

    let err = client
        .try_perform(&ScrapeRequest::new("example.com"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        TransportKind::TooLarge { max_bytes: 16, .. }
    ));
}

#[tokio::test]
async fn success_with_garbage_body_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .perform_request(&ScrapeRequest::new("example.com"))
        .await;

    assert_eq!(
        result,
        ScrapeResult::Failure(CONNECT_FAILURE_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn failure_status_with_html_page_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .try_perform(&ScrapeRequest::new("example.com"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, TransportKind::Decode);

    let result = client.perform_request(&ScrapeRequest::new("example.com")).await;
    assert_eq!(
        result,
        ScrapeResult::Failure(CONNECT_FAILURE_MESSAGE.to_string())
    );
}

#[tokio::test]
async fn failure_status_error_survives_malformed_iframes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "error": "blocked", "iframes": "x" })),
        )
        .mount(&server)
        .await;

    let result = client_for(&server)
        .perform_request(&ScrapeRequest::new("example.com"))
        .await;

    assert_eq!(result, ScrapeResult::Failure("blocked".to_string()));
}

#[tokio::test]
async fn items_survive_message_of_wrong_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "iframes": ["https://a.com"], "message": 5 })),
        )
        .mount(&server)
        .await;

    let result = client_for(&server)
        .perform_request(&ScrapeRequest::new("example.com"))
        .await;

    assert_eq!(
        result,
        ScrapeResult::success(vec!["https://a.com".to_string()], None)
    );
}
