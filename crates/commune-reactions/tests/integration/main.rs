use commune_reactions::{api::ReactionTarget, config::RequestConfig, Client};
use wiremock::MockServer;

mod catalog;
mod client;

/// A client pointed at a fresh mock server, authenticated with the usual test
/// token and with retries disabled.
async fn no_retry_test_client() -> (Client, MockServer) {
    let server = MockServer::start().await;
    let client = Client::builder()
        .base_url(server.uri())
        .access_token("1234")
        .request_config(RequestConfig::new().disable_retry())
        .build()
        .unwrap();

    (client, server)
}

/// Same as [`no_retry_test_client`], but transient failures are retried up to
/// `retry_limit` attempts.
async fn retrying_test_client(retry_limit: u64) -> (Client, MockServer) {
    let server = MockServer::start().await;
    let client = Client::builder()
        .base_url(server.uri())
        .access_token("1234")
        .request_config(RequestConfig::new().retry_limit(retry_limit))
        .build()
        .unwrap();

    (client, server)
}

fn test_target() -> ReactionTarget {
    ReactionTarget::post("1337")
}
