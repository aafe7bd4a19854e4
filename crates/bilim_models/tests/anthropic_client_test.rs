use bilim_error::{BilimErrorKind, ServiceErrorKind};
use bilim_interface::TextDriver;
use bilim_models::AnthropicClient;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn message_body(text: &str) -> serde_json::Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-5-sonnet-20241022",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 120, "output_tokens": 35}
    })
}

#[tokio::test]
async fn test_request_format_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-anthropic-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 80,
            "messages": [{"role": "user", "content": "Hello"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message_body("Salom")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = AnthropicClient::new("test-anthropic-key", "claude-3-5-sonnet-20241022")
        .with_base_url(mock_server.uri());

    let response = client.generate("Hello", 80).await.expect("request should succeed");

    assert_eq!(response.text, "Salom");
    assert_eq!(response.usage.input_tokens, 120);
    assert_eq!(response.usage.output_tokens, 35);
    assert_eq!(response.usage.total(), 155);
}

#[tokio::test]
async fn test_text_blocks_are_joined_and_other_blocks_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_blocks",
            "content": [
                {"type": "text", "text": "Birinchi\n"},
                {"type": "thinking", "thinking": "..."},
                {"type": "text", "text": "Chunki ikkinchi"}
            ],
            "usage": {"input_tokens": 1, "output_tokens": 2}
        })))
        .mount(&mock_server)
        .await;

    let client = AnthropicClient::new("key", "model").with_base_url(mock_server.uri());
    let response = client.generate("prompt", 80).await.expect("request should succeed");

    assert_eq!(response.text, "Birinchi\nChunki ikkinchi");
}

#[tokio::test]
async fn test_error_status_maps_to_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_json(json!({
            "type": "error",
            "error": {"type": "overloaded_error", "message": "Overloaded"}
        })))
        .mount(&mock_server)
        .await;

    let client = AnthropicClient::new("key", "model").with_base_url(mock_server.uri());
    let err = client.generate("prompt", 80).await.unwrap_err();

    match err.kind() {
        BilimErrorKind::Service(e) => {
            assert!(matches!(e.kind, ServiceErrorKind::Status { status: 529, .. }));
            assert!(e.is_transient());
        }
        other => panic!("unexpected error kind: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = AnthropicClient::new("key", "model").with_base_url(mock_server.uri());
    let err = client.generate("prompt", 80).await.unwrap_err();

    assert!(matches!(
        err.kind(),
        BilimErrorKind::Service(e) if matches!(e.kind, ServiceErrorKind::Decode { .. })
    ));
    assert!(!err.is_transient());
}
