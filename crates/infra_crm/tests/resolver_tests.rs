//! Integration tests for credential resolution against a mock broker.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use core_kernel::CrmError;
use infra_crm::{BrokerConfig, CredentialResolver, TokenPrecedence};

fn broker_config(base_url: &str) -> BrokerConfig {
    BrokerConfig {
        connection_id: "conn-1".to_string(),
        integration_id: "hubspot".to_string(),
        base_url: base_url.to_string(),
        secret_key: "sk-test".to_string(),
    }
}

#[tokio::test]
async fn broker_token_is_fetched_once_and_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connection/conn-1"))
        .and(query_param("provider_config_key", "hubspot"))
        .and(query_param("refresh_token", "true"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "credentials": {"access_token": "T"}
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resolver = CredentialResolver::new(
        Ok(broker_config(&server.uri())),
        Some("S".to_string()),
        TokenPrecedence::BrokerFirst,
    );

    assert_eq!(resolver.get_token().await.unwrap(), "T");
    // Second call must come from the cache; the mock's expect(1) verifies
    // the broker saw exactly one round trip.
    assert_eq!(resolver.get_token().await.unwrap(), "T");
}

#[tokio::test]
async fn broker_failure_falls_back_to_static_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connection/conn-1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("broker down"))
        .mount(&server)
        .await;

    let resolver = CredentialResolver::new(
        Ok(broker_config(&server.uri())),
        Some("S".to_string()),
        TokenPrecedence::BrokerFirst,
    );

    assert_eq!(resolver.get_token().await.unwrap(), "S");
}

#[tokio::test]
async fn broker_response_without_token_falls_back_to_static() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connection/conn-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {}
        })))
        .mount(&server)
        .await;

    let resolver = CredentialResolver::new(
        Ok(broker_config(&server.uri())),
        Some("S".to_string()),
        TokenPrecedence::BrokerFirst,
    );

    assert_eq!(resolver.get_token().await.unwrap(), "S");
}

#[tokio::test]
async fn broker_failure_without_static_is_a_credential_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connection/conn-1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let resolver = CredentialResolver::new(
        Ok(broker_config(&server.uri())),
        None,
        TokenPrecedence::BrokerFirst,
    );

    let err = resolver.get_token().await.unwrap_err();
    match err {
        CrmError::Credential { message, .. } => {
            assert!(message.contains("Failed to get access token"));
        }
        other => panic!("expected credential error, got {other:?}"),
    }
}

#[tokio::test]
async fn static_first_precedence_never_contacts_the_broker() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connection/conn-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {"access_token": "T"}
        })))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = CredentialResolver::new(
        Ok(broker_config(&server.uri())),
        Some("S".to_string()),
        TokenPrecedence::StaticFirst,
    );

    assert_eq!(resolver.get_token().await.unwrap(), "S");
}

#[tokio::test]
async fn invalidate_forces_a_fresh_broker_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connection/conn-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "credentials": {"access_token": "T"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = CredentialResolver::new(
        Ok(broker_config(&server.uri())),
        None,
        TokenPrecedence::BrokerFirst,
    );

    assert_eq!(resolver.get_token().await.unwrap(), "T");
    resolver.invalidate().await;
    assert_eq!(resolver.get_token().await.unwrap(), "T");
}
