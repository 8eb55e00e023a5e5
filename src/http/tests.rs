//! Tests for the HTTP transport module

use super::*;
use crate::auth::Credentials;
use crate::error::Error;
use crate::types::BackoffType;
use pretty_assertions::assert_eq;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 0);
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("comms-rest/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_builder() {
    let request = Request::get("https://api.example.com/v1/Services")
        .query("PageSize", "20")
        .queries([("Status", "active")])
        .header("X-Request-Id", "abc123")
        .timeout(Duration::from_secs(10))
        .retries(2);

    assert_eq!(request.query_value("PageSize"), Some("20"));
    assert_eq!(request.query_value("Status"), Some("active"));
    assert_eq!(request.query_value("Missing"), None);
    assert_eq!(
        request.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert_eq!(request.timeout, Some(Duration::from_secs(10)));
    assert_eq!(request.max_retries, Some(2));
}

#[test]
fn test_response_into_api_error_structured() {
    let response = Response::new(
        404,
        r#"{"code": 20404, "message": "The requested resource was not found", "more_info": "https://docs.example.com/errors/20404", "status": 404}"#,
    );

    match response.into_api_error() {
        Error::Api {
            status,
            code,
            message,
            more_info,
        } => {
            assert_eq!(status, 404);
            assert_eq!(code, Some(20404));
            assert_eq!(message, "The requested resource was not found");
            assert_eq!(
                more_info.as_deref(),
                Some("https://docs.example.com/errors/20404")
            );
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[test]
fn test_response_into_api_error_plain_text() {
    let err = Response::new(502, "Bad Gateway").into_api_error();
    assert!(matches!(err, Error::Api { status: 502, code: None, ref message, .. } if message == "Bad Gateway"));
}

#[test]
fn test_response_error_for_status() {
    assert!(Response::new(200, "{}").error_for_status().is_ok());
    assert!(Response::new(401, "{}").error_for_status().is_err());
}

#[tokio::test]
async fn test_http_client_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/Services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "services": [{"sid": "IS1"}]
        })))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let response = client
        .execute(Request::get(format!("{}/v1/Services", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["services"][0]["sid"], "IS1");
}

#[tokio::test]
async fn test_http_client_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2010-04-01/Accounts/AC1/Messages.json"))
        .and(query_param("To", "+15558675310"))
        .and(query_param("PageSize", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "messages": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let response = client
        .send(
            Request::get(format!(
                "{}/2010-04-01/Accounts/AC1/Messages.json",
                mock_server.uri()
            ))
            .query("To", "+15558675310")
            .query("PageSize", "2"),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_form_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2010-04-01/Accounts/AC1/Messages.json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("Body=hello"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "sid": "SM1"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client();
    let response = client
        .send(
            Request::post(format!(
                "{}/2010-04-01/Accounts/AC1/Messages.json",
                mock_server.uri()
            ))
            .form(vec![("Body".to_string(), "hello".to_string())]),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn test_http_client_default_and_request_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/data"))
        .and(header("X-Default", "d"))
        .and(header("X-Request-Id", "req-456"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .header("X-Default", "d")
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client
        .send(Request::get(format!("{}/v1/data", mock_server.uri())).header("X-Request-Id", "req-456"))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_applies_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secure"))
        .and(header("Authorization", "Basic QUMxMjM6c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_credentials(
        HttpClientConfig::builder().no_rate_limit().build(),
        Credentials::basic("AC123", "secret"),
    )
    .unwrap();

    let response = client
        .execute(Request::get(format!("{}/v1/secure", mock_server.uri())))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_returns_non_2xx_as_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let response = client
        .execute(Request::get(format!("{}/v1/missing", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(response.body, "Not found");
}

#[tokio::test]
async fn test_http_client_no_retry_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client();
    let response = client
        .execute(Request::get(format!("{}/v1/flaky", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, 500);
}

#[tokio::test]
async fn test_http_client_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First two calls return 500, third succeeds
    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .max_retries(3)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client
        .execute(Request::get(format!("{}/v1/flaky", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_retry_after_on_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder().max_retries(2).no_rate_limit().build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client
        .execute(Request::get(format!("{}/v1/limited", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_retries_exhausted_returns_last_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/always-fail"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Server error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .max_retries(2)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let response = client
        .execute(Request::get(format!("{}/v1/always-fail", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(response.status, 503);
    assert_eq!(response.body, "Server error");
}

#[tokio::test]
async fn test_http_client_connection_refused_is_transport_error() {
    let client = test_client();
    // Port 9 (discard) on localhost is not expected to accept HTTP connections
    let result = client.execute(Request::get("http://127.0.0.1:9/v1/none")).await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[test]
fn test_calculate_backoff_constant() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(100),
            Duration::from_secs(10),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(5), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_linear() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(100),
            Duration::from_secs(10),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(300));
}

#[test]
fn test_calculate_backoff_linear_saturates_at_max() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Linear,
            Duration::from_secs(1),
            Duration::from_secs(30),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(u32::MAX - 1), Duration::from_secs(30));
    assert_eq!(client.calculate_backoff(u32::MAX), Duration::from_secs(30));
}

#[tokio::test]
async fn test_http_client_caps_retry_after_at_max_backoff() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/throttled"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "3600")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/throttled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .max_retries(1)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();
    let started = std::time::Instant::now();
    let response = tokio::time::timeout(
        Duration::from_secs(10),
        client.execute(Request::get(format!("{}/v1/throttled", mock_server.uri()))),
    )
    .await
    .expect("Retry-After should be capped")
    .unwrap();

    assert_eq!(response.status, 200);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_calculate_backoff_exponential_respects_max() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(10), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(40), Duration::from_millis(500));
}

#[test]
fn test_http_client_debug_redacts_credentials() {
    let client = HttpClient::with_credentials(
        HttpClientConfig::default(),
        Credentials::basic("AC123", "supersecret"),
    )
    .unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("AC123"));
    assert!(!debug_str.contains("supersecret"));
}

#[tokio::test]
async fn test_http_client_with_rate_limiter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/data"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());

    for _ in 0..3 {
        let response = client
            .execute(Request::get(format!("{}/v1/data", mock_server.uri())))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
    }
}
