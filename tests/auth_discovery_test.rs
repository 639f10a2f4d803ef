//! End-to-end tests for client-credentials authentication

use credhub_sdk::ClientBuilder;
use serde_json::json;
use wiremock::{
    matchers::{basic_auth, body_string_contains, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

async fn mount_info(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth-server": {"url": server.uri()},
            "app": {"name": "CredHub"}
        })))
        .expect(1)
        .mount(server)
        .await;
}

fn paths_body() -> serde_json::Value {
    json!({"paths": [{"path": "/deploy/"}]})
}

#[tokio::test]
async fn test_discovers_token_endpoint_and_authenticates() {
    let server = MockServer::start().await;
    mount_info(&server).await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth("credhub_client", "secret"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("scope=credhub.read"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued-token",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/data"))
        .and(query_param("paths", "true"))
        .and(header("Authorization", "Bearer issued-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paths_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = ClientBuilder::new(server.uri())
        .client_credentials("credhub_client", "secret")
        .scopes(["credhub.read"])
        .allow_insecure_http()
        .build()
        .unwrap();

    // The second call reuses the cached token
    assert_eq!(client.list_all_paths().await.unwrap(), vec!["/deploy/"]);
    assert_eq!(client.list_all_paths().await.unwrap(), vec!["/deploy/"]);
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "issued-token",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&server)
        .await;

    // First attempt is rejected, the re-sent request succeeds
    Mock::given(method("GET"))
        .and(path("/api/v1/data"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paths_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ClientBuilder::new(server.uri())
        .client_credentials("credhub_client", "secret")
        .token_url(format!("{}/oauth/token", server.uri()))
        .allow_insecure_http()
        .build()
        .unwrap();

    assert_eq!(client.list_all_paths().await.unwrap(), vec!["/deploy/"]);
}

#[tokio::test]
async fn test_token_failure_is_auth_error() {
    let server = MockServer::start().await;
    mount_info(&server).await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "unauthorized",
            "error_description": "Bad credentials"
        })))
        .mount(&server)
        .await;

    let client = ClientBuilder::new(server.uri())
        .client_credentials("credhub_client", "wrong")
        .allow_insecure_http()
        .build()
        .unwrap();

    let err = client.list_all_paths().await.unwrap_err();
    assert_eq!(err.kind(), credhub_sdk::ErrorKind::Auth);
    assert!(err.to_string().contains("Bad credentials"));
}

#[tokio::test]
async fn test_auth_server_url() {
    let server = MockServer::start().await;
    mount_info(&server).await;

    let client = ClientBuilder::new(server.uri())
        .auth(credhub_sdk::Auth::bearer("t"))
        .allow_insecure_http()
        .build()
        .unwrap();

    assert_eq!(client.auth_server_url().await.unwrap(), server.uri());
}
