use bilim_error::{BilimErrorKind, ServiceErrorKind};
use bilim_interface::PhotoSearch;
use bilim_social::PexelsClient;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_search_sends_expected_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(header("Authorization", "test-pexels-key"))
        .and(query_param("query", "moon ice poles"))
        .and(query_param("per_page", "15"))
        .and(query_param("orientation", "landscape"))
        .and(query_param("size", "large"))
        .and(query_param("locale", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "per_page": 15,
            "photos": [{
                "id": 2387418,
                "width": 4000,
                "height": 2667,
                "url": "https://www.pexels.com/photo/moon-2387418/",
                "liked": false,
                "src": {
                    "original": "https://images.pexels.com/photos/2387418/original.jpeg",
                    "large": "https://images.pexels.com/photos/2387418/large.jpeg"
                }
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PexelsClient::new("test-pexels-key").with_base_url(mock_server.uri());
    let photos = client.search("moon ice poles").await.expect("search should succeed");

    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].width, 4000);
    assert!(!photos[0].liked);
    assert_eq!(photos[0].src.large, "https://images.pexels.com/photos/2387418/large.jpeg");
}

#[tokio::test]
async fn test_missing_photos_field_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_results": 0})))
        .mount(&mock_server)
        .await;

    let client = PexelsClient::new("key").with_base_url(mock_server.uri());
    let photos = client.search("nothing at all here").await.expect("search should succeed");

    assert!(photos.is_empty());
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&mock_server)
        .await;

    let client = PexelsClient::new("bad-key").with_base_url(mock_server.uri());
    let err = client.search("moon ice poles").await.unwrap_err();

    assert!(matches!(
        err.kind(),
        BilimErrorKind::Service(e) if matches!(e.kind, ServiceErrorKind::Status { status: 401, .. })
    ));
}
