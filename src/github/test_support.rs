//! Shared helpers for wiremock-backed tests.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build an octocrab client pointed at the mock server.
pub(crate) async fn github_for(server: &MockServer) -> octocrab::Octocrab {
    octocrab::Octocrab::builder()
        .base_uri(server.uri())
        .expect("mock server uri")
        .build()
        .expect("octocrab client")
}

/// Answer every GraphQL POST with the given body.
pub(crate) async fn mount_graphql(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
