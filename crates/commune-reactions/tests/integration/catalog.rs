use std::time::Duration;

use serde_json::json;
use tokio::join;
use wiremock::{
    matchers::{header, method, path},
    Mock, ResponseTemplate,
};

use crate::no_retry_test_client;

#[tokio::test]
async fn catalog_is_fetched_once() {
    let (client, server) = no_retry_test_client().await;

    Mock::given(method("GET"))
        .and(path("/reactions/emoji-main-list"))
        .and(header("authorization", "Bearer 1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "like", "emoji": "👍" },
            { "name": "love", "emoji": "❤️" },
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = client.emoji_catalog().await;
    assert_eq!(catalog.get("like").map(String::as_str), Some("👍"));

    // Served from the cache, the expectation above stays at one request.
    let catalog = client.emoji_catalog().await;
    assert_eq!(catalog.get("love").map(String::as_str), Some("❤️"));

    server.verify().await;
}

#[tokio::test]
async fn concurrent_first_calls_share_one_fetch() {
    let (client, server) = no_retry_test_client().await;

    Mock::given(method("GET"))
        .and(path("/reactions/emoji-main-list"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "name": "like", "emoji": "👍" }]))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (first, second) = join!(client.emoji_catalog(), client.emoji_catalog());

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);

    server.verify().await;
}

#[tokio::test]
async fn failed_fetch_returns_empty_and_is_retried() {
    let (client, server) = no_retry_test_client().await;

    Mock::given(method("GET"))
        .and(path("/reactions/emoji-main-list"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reactions/emoji-main-list"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "name": "like", "emoji": "👍" }])),
        )
        .mount(&server)
        .await;

    // The failed fetch degrades to an empty catalog instead of an error…
    let catalog = client.emoji_catalog().await;
    assert!(catalog.is_empty());

    // …and the next call hits the network again.
    let catalog = client.emoji_catalog().await;
    assert_eq!(catalog.get("like").map(String::as_str), Some("👍"));
}
