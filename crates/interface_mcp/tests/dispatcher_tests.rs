//! Dispatcher boundary tests over a scripted transport.
//!
//! These cover the uniform-envelope contract: exactly one of result/error on
//! every terminal response, unknown tools answered without any HTTP call,
//! and handler failures of every kind folded into the error string.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use core_kernel::CrmError;
use interface_mcp::Dispatcher;
use test_utils::{last_page, sample_company, search_response, MockTransport};

fn args(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

// ============================================================================
// Envelope contract
// ============================================================================

#[tokio::test]
async fn unknown_tool_is_a_terminal_error_with_no_http_call() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher = Dispatcher::new(transport.clone());

    let envelope = dispatcher.invoke("summon_demo_data", Map::new()).await;

    assert!(envelope.is_well_formed());
    assert_eq!(envelope.result, None);
    assert_eq!(envelope.error.as_deref(), Some("Unknown tool: summon_demo_data"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn successful_invocation_has_strictly_null_error() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_ok(200, last_page(vec![sample_company("1", "Acme", "acme.com")]));
    let dispatcher = Dispatcher::new(transport.clone());

    let envelope = dispatcher.invoke("get_all_companies", Map::new()).await;

    assert!(envelope.is_well_formed());
    assert!(envelope.error.is_none());
    assert_eq!(envelope.result.unwrap().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn handler_api_failure_is_folded_into_the_error_string() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_err(CrmError::Api {
        status: 403,
        reason: "Forbidden".to_string(),
        body: "{\"message\":\"scope missing\"}".to_string(),
    });
    let dispatcher = Dispatcher::new(transport.clone());

    let envelope = dispatcher
        .invoke("get_company_details", args(&[("company_id", json!("42"))]))
        .await;

    assert!(envelope.is_well_formed());
    assert_eq!(envelope.result, None);
    let error = envelope.error.unwrap();
    assert!(error.contains("403"));
    assert!(error.contains("scope missing"));
}

#[tokio::test]
async fn transport_failure_is_folded_into_the_error_string() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_err(CrmError::transport("connection refused"));
    let dispatcher = Dispatcher::new(transport.clone());

    let envelope = dispatcher.invoke("get_deal_pipelines", Map::new()).await;

    assert!(envelope.is_well_formed());
    assert_eq!(
        envelope.error.as_deref(),
        Some("API request failed: connection refused")
    );
}

// ============================================================================
// Central argument validation
// ============================================================================

#[tokio::test]
async fn missing_required_arguments_are_rejected_before_the_handler() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher = Dispatcher::new(transport.clone());

    let envelope = dispatcher
        .invoke("create_contact", args(&[("email", json!("a@b.com"))]))
        .await;

    assert!(envelope.is_well_formed());
    let error = envelope.error.unwrap();
    assert!(error.contains("Missing required arguments for create_contact"));
    assert!(error.contains("first_name"));
    assert!(error.contains("last_name"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn catalog_defaults_are_merged_into_the_arguments() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_ok(200, search_response(vec![]));
    let dispatcher = Dispatcher::new(transport.clone());

    dispatcher
        .invoke(
            "search_company_by_domain",
            args(&[("domain", json!("example.com"))]),
        )
        .await;

    let body = transport.only_request().body.unwrap();
    assert_eq!(body["limit"], 10);
}

#[tokio::test]
async fn wrongly_typed_arguments_surface_as_validation_errors() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher = Dispatcher::new(transport.clone());

    let envelope = dispatcher
        .invoke("get_company_details", args(&[("company_id", json!(42))]))
        .await;

    assert!(envelope.is_well_formed());
    assert_eq!(
        envelope.error.as_deref(),
        Some("Argument 'company_id' must be a string")
    );
    assert_eq!(transport.request_count(), 0);
}

// ============================================================================
// End-to-end scenarios from the surface contract
// ============================================================================

#[tokio::test]
async fn search_by_domain_normalizes_before_building_the_filter() {
    let transport = Arc::new(MockTransport::new());
    transport.enqueue_ok(200, search_response(vec![]));
    let dispatcher = Dispatcher::new(transport.clone());

    let envelope = dispatcher
        .invoke(
            "search_company_by_domain",
            args(&[("domain", json!("www.example.com")), ("limit", json!(5))]),
        )
        .await;

    assert!(envelope.is_ok());
    let body = transport.only_request().body.unwrap();
    assert_eq!(
        body["filterGroups"][0]["filters"][0]["value"],
        "example.com"
    );
    assert_eq!(body["limit"], 5);
}

#[tokio::test]
async fn update_company_without_fields_never_reaches_the_wire() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher = Dispatcher::new(transport.clone());

    let envelope = dispatcher
        .invoke("update_company", args(&[("company_id", json!("42"))]))
        .await;

    assert!(envelope.is_well_formed());
    assert_eq!(envelope.result, None);
    assert_eq!(envelope.error.as_deref(), Some("No fields provided for update"));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn every_catalog_operation_routes_to_a_handler() {
    // Invoking each operation with empty arguments must produce a well-formed
    // envelope: either a validation error (missing required args) or a result
    // from the scripted response. None may escape as a panic or a violated
    // envelope.
    let transport = Arc::new(MockTransport::new());
    let dispatcher = Dispatcher::new(transport.clone());

    let names: Vec<&str> = dispatcher
        .catalog()
        .iter()
        .map(|spec| spec.name)
        .collect();
    assert_eq!(names.len(), 38);

    for name in names {
        for _ in 0..4 {
            // Enough scripted pages for the paginated listings.
            transport.enqueue_ok(200, last_page(vec![]));
        }
        let envelope = dispatcher.invoke(name, Map::new()).await;
        assert!(envelope.is_well_formed(), "envelope violated for {name}");
    }
}
