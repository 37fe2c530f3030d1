use assert_matches2::{assert_let, assert_matches};
use commune_reactions::HttpError;
use http::StatusCode;
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, ResponseTemplate,
};

use crate::{no_retry_test_client, retrying_test_client, test_target};

#[tokio::test]
async fn reaction_counts() {
    let (client, server) = no_retry_test_client().await;

    Mock::given(method("GET"))
        .and(path("/reactions/count"))
        .and(query_param("targetId", "1337"))
        .and(query_param("targetTypeCode", "POST"))
        .and(header("authorization", "Bearer 1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "like": 3, "love": 1 })))
        .mount(&server)
        .await;

    let counts = client.reaction_counts(&test_target()).await.unwrap();

    assert_eq!(counts.len(), 2);
    assert_eq!(counts.get("like"), Some(&3));
    assert_eq!(counts.get("love"), Some(&1));
}

#[tokio::test]
async fn top_reactions() {
    let (client, server) = no_retry_test_client().await;

    Mock::given(method("GET"))
        .and(path("/reactions/top3"))
        .and(query_param("targetId", "1337"))
        .and(query_param("targetTypeCode", "POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "reactionType": { "name": "like", "emoji": "👍" }, "count": 3 },
            { "reactionType": { "name": "love", "emoji": "❤️" }, "count": 1 },
        ])))
        .mount(&server)
        .await;

    let top = client.top_reactions(&test_target()).await.unwrap();

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].reaction_type.name, "like");
    assert_eq!(top[0].count, 3);
    assert_eq!(top[1].reaction_type.emoji, "❤️");
}

#[tokio::test]
async fn user_reaction_present() {
    let (client, server) = no_retry_test_client().await;

    Mock::given(method("POST"))
        .and(path("/reactions/user"))
        .and(body_json(json!({
            "userId": "@alice",
            "targetId": "1337",
            "targetTypeCode": "POST",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "emoji": "👍" })))
        .mount(&server)
        .await;

    let reaction = client.user_reaction("@alice", &test_target()).await.unwrap();

    assert_eq!(reaction.as_deref(), Some("👍"));
}

#[tokio::test]
async fn user_reaction_no_content() {
    let (client, server) = no_retry_test_client().await;

    Mock::given(method("POST"))
        .and(path("/reactions/user"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let reaction = client.user_reaction("@alice", &test_target()).await.unwrap();

    assert_eq!(reaction, None);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let (client, server) = retrying_test_client(3).await;

    Mock::given(method("GET"))
        .and(path("/reactions/count"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "unknown target" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = client.reaction_counts(&test_target()).await.unwrap_err();

    assert_let!(Some(api_error) = error.as_api_error());
    assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
    assert_eq!(api_error.message.as_deref(), Some("unknown target"));

    server.verify().await;
}

#[tokio::test]
async fn server_error_is_retried() {
    let (client, server) = retrying_test_client(3).await;

    Mock::given(method("GET"))
        .and(path("/reactions/count"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reactions/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "like": 3 })))
        .mount(&server)
        .await;

    let counts = client.reaction_counts(&test_target()).await.unwrap();

    assert_eq!(counts.get("like"), Some(&3));
}

#[tokio::test]
async fn missing_token_suppresses_requests() {
    let server = wiremock::MockServer::start().await;
    let client = commune_reactions::Client::builder().base_url(server.uri()).build().unwrap();

    let error = client.user_reaction("@alice", &test_target()).await.unwrap_err();
    assert_matches!(error, HttpError::AuthenticationRequired);

    assert!(server.received_requests().await.unwrap().is_empty());
}
