//! HttpManager against a mock server

use clusterload_http::{HttpClient, HttpConfig, HttpError, HttpManager};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_returns_status_and_length() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/clusters/4a09785674d14344d92b1212b6e810369535ea1c"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = HttpManager::new(&mock_server.uri()).unwrap();
    let response = manager
        .get("/clusters/4a09785674d14344d92b1212b6e810369535ea1c")
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.content_length, 11);
    assert!(!response.is_failure());
}

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let manager = HttpManager::new(&mock_server.uri()).unwrap();
    let response = manager.get("/clusters/unknown").await.unwrap();

    assert_eq!(response.status, 503);
    assert!(response.is_failure());
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "clusterload-test"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpConfig {
        user_agent: "clusterload-test".to_string(),
        ..Default::default()
    };
    let manager = HttpManager::with_config(&mock_server.uri(), config).unwrap();

    assert_eq!(manager.get("/").await.unwrap().status, 204);
}

#[tokio::test]
async fn test_timeout_is_reported_as_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let config = HttpConfig {
        timeout: Duration::from_millis(100),
        ..Default::default()
    };
    let manager = HttpManager::with_config(&mock_server.uri(), config).unwrap();

    let err = manager.get("/slow").await.unwrap_err();
    assert_eq!(err.kind(), "timeout");
}

#[tokio::test]
async fn test_connection_refused() {
    // Nothing listens on the discard port.
    let manager = HttpManager::new("http://127.0.0.1:9").unwrap();
    let err = manager.get("/clusters/x").await.unwrap_err();
    assert!(matches!(err, HttpError::NetworkError(_)));
    assert!(matches!(err.kind(), "connect" | "network"));
}

#[tokio::test]
async fn test_shared_through_arc() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client: Arc<dyn HttpClient> = Arc::new(HttpManager::new(&mock_server.uri()).unwrap());
    for _ in 0..3 {
        let shared = Arc::clone(&client);
        assert_eq!(shared.get("/").await.unwrap().status, 200);
    }
}
