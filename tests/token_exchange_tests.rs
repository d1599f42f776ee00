//! # Token Exchange Integration Tests
//!
//! Exercises the OAuth2 client-credentials grant against a mock identity
//! provider, plus the full secret-store-to-token round trip.

use std::sync::Arc;

use billing_dashboard::config::{AzureAdConfig, SecretStoreConfig};
use billing_dashboard::secrets::{
    AnonymousAuth, AzureCredentials, CredentialError, SecretStoreClient, SecretValue,
    TokenExchanger,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn exchanger(server: &MockServer) -> TokenExchanger {
    TokenExchanger::new(&AzureAdConfig {
        issuer_base: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

fn credentials() -> AzureCredentials {
    AzureCredentials {
        client_id: "app-123".to_string(),
        client_secret: SecretValue::new("s3cr3t"),
        tenant_id: "tenant-456".to_string(),
    }
}

#[tokio::test]
async fn exchange_returns_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-456/oauth2/v2.0/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=app-123"))
        .and(body_string_contains("client_secret=s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc123",
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = exchanger(&server)
        .exchange(&credentials(), "https://graph.microsoft.com/.default")
        .await
        .unwrap();
    assert_eq!(token.expose(), "abc123");
}

#[tokio::test]
async fn exchange_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-456/oauth2/v2.0/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_client"}"#),
        )
        .mount(&server)
        .await;

    let err = exchanger(&server)
        .exchange(&credentials(), "https://graph.microsoft.com/.default")
        .await
        .unwrap_err();
    match err {
        CredentialError::TokenExchangeFailed { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert!(body.contains("invalid_client"));
        }
        other => panic!("expected TokenExchangeFailed, got: {other}"),
    }
}

#[tokio::test]
async fn exchange_rejects_unparseable_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-456/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("definitely not json"))
        .mount(&server)
        .await;

    let err = exchanger(&server)
        .exchange(&credentials(), "scope")
        .await
        .unwrap_err();
    assert!(matches!(err, CredentialError::MalformedResponse { .. }));
}

#[tokio::test]
async fn exchange_rejects_body_without_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenant-456/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token_type": "Bearer" })))
        .mount(&server)
        .await;

    let err = exchanger(&server)
        .exchange(&credentials(), "scope")
        .await
        .unwrap_err();
    assert!(matches!(err, CredentialError::MalformedResponse { .. }));
}

/// Full round trip: no caching means every call re-invokes both the secret
/// store and the token endpoint exactly once.
#[tokio::test]
async fn get_access_token_round_trip_is_deterministic() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/winauthwebservices/api/v1/secrets/42813"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "slug": "clientId", "itemValue": "app-123" },
                { "slug": "clientSecret", "itemValue": "s3cr3t" },
                { "slug": "tenantId", "itemValue": "tenant-456" },
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tenant-456/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access_token": "abc123" })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = SecretStoreClient::new(
        &SecretStoreConfig {
            base_url: server.uri(),
            secret_id: 42813,
            verify_tls: true,
            http_timeout_secs: 5,
        },
        &AzureAdConfig {
            issuer_base: server.uri(),
            ..Default::default()
        },
        Arc::new(AnonymousAuth),
    )
    .unwrap();

    let first = client.get_access_token().await.unwrap();
    let second = client.get_access_token().await.unwrap();
    assert_eq!(first.expose(), "abc123");
    assert_eq!(second.expose(), "abc123");

    // MockServer verifies the expect(2) counts on drop
}

/// The token exchange stage failing must surface as TokenExchangeFailed even
/// though credential retrieval succeeded - the error kind identifies the stage.
#[tokio::test]
async fn get_access_token_identifies_the_failing_stage() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/winauthwebservices/api/v1/secrets/42813"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "slug": "clientId", "itemValue": "app-123" },
                { "slug": "clientSecret", "itemValue": "s3cr3t" },
                { "slug": "tenantId", "itemValue": "tenant-456" },
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tenant-456/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad secret"))
        .mount(&server)
        .await;

    let client = SecretStoreClient::new(
        &SecretStoreConfig {
            base_url: server.uri(),
            secret_id: 42813,
            verify_tls: true,
            http_timeout_secs: 5,
        },
        &AzureAdConfig {
            issuer_base: server.uri(),
            ..Default::default()
        },
        Arc::new(AnonymousAuth),
    )
    .unwrap();

    let err = client.get_access_token().await.unwrap_err();
    assert!(matches!(
        err,
        CredentialError::TokenExchangeFailed { .. }
    ));
}
