use bilim_error::{BilimErrorKind, ServiceErrorKind};
use bilim_interface::{Channel, MessageId};
use bilim_social::{TelegramChannel, TelegramClient, UpdatePoller};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "123456:test-token";

fn client(server: &MockServer) -> TelegramClient {
    TelegramClient::new(TOKEN, Duration::from_secs(5))
        .expect("client should build")
        .with_base_url(server.uri())
        .with_retries(2, Duration::from_millis(10))
}

fn sent_message(message_id: i64) -> serde_json::Value {
    json!({
        "ok": true,
        "result": {
            "message_id": message_id,
            "date": 1730613600,
            "chat": {
                "id": -1001234567890i64,
                "title": "Bilim",
                "username": "bilim_faktlar",
                "type": "channel"
            },
            "photo": [{"file_id": "abc", "width": 1280, "height": 853}],
            "caption": "Fakt"
        }
    })
}

#[tokio::test]
async fn test_send_photo_posts_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendPhoto")))
        .and(body_json(json!({
            "chat_id": "@bilim_faktlar",
            "photo": "https://images.pexels.com/photos/1/large.jpeg",
            "caption": "Fakt\n👉 Chunki sabab\n\n@bilim_faktlar"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent_message(42)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let channel = TelegramChannel::new(Arc::new(client(&mock_server)), "@bilim_faktlar");
    let id = channel
        .publish_photo(
            "https://images.pexels.com/photos/1/large.jpeg",
            "Fakt\n👉 Chunki sabab\n\n@bilim_faktlar",
        )
        .await
        .expect("publish should succeed");

    assert_eq!(id, MessageId(42));
    assert_eq!(channel.channel_name(), "@bilim_faktlar");
}

#[tokio::test]
async fn test_api_rejection_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendPhoto")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .send_photo("@missing", "https://example.com/a.jpeg", "caption")
        .await
        .unwrap_err();

    match err.kind() {
        BilimErrorKind::Service(e) => match &e.kind {
            ServiceErrorKind::Rejected { message, .. } => {
                assert_eq!(message, "Bad Request: chat not found");
            }
            other => panic!("unexpected service error: {other}"),
        },
        other => panic!("unexpected error kind: {other}"),
    }
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendPhoto")))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendPhoto")))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent_message(7)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let message = client(&mock_server)
        .send_photo("@bilim_faktlar", "https://example.com/a.jpeg", "caption")
        .await
        .expect("third attempt should succeed");

    assert_eq!(*message.message_id(), 7);
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendPhoto")))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 1"
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .send_photo("@bilim_faktlar", "https://example.com/a.jpeg", "caption")
        .await
        .unwrap_err();

    assert!(err.is_transient());
}

#[tokio::test]
async fn test_poller_advances_offset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(query_param("offset", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/bot{TOKEN}/getUpdates")))
        .and(query_param("timeout", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                {"update_id": 9, "message": {"message_id": 1, "date": 0, "text": "/start"}},
                {"update_id": 10, "channel_post": {"message_id": 2, "date": 0, "text": "hi"}}
            ]
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let mut poller = UpdatePoller::new(Arc::new(client(&mock_server)), Duration::from_secs(1));
    assert_eq!(poller.offset(), None);

    let updates = poller.poll().await.expect("first poll should succeed");
    assert_eq!(updates.len(), 2);
    assert_eq!(poller.offset(), Some(11));

    let updates = poller.poll().await.expect("second poll should succeed");
    assert!(updates.is_empty());
    assert_eq!(poller.offset(), Some(11));
}
