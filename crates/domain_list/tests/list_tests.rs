//! Handler tests for the list domain over a scripted transport.

use serde_json::json;

use core_kernel::{CrmError, HttpMethod};
use domain_list::{create_static_list, delete_list, CreateStaticListParams};
use test_utils::MockTransport;

#[tokio::test]
async fn create_static_list_builds_a_manual_contacts_list() {
    let transport = MockTransport::with_response(json!({"listId": "12", "name": "VIPs"}));

    let result = create_static_list(
        &transport,
        CreateStaticListParams {
            name: "VIPs".to_string(),
            list_type: "CONTACTS".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(result["status"], "success");
    assert_eq!(result["list"]["listId"], "12");

    let request = transport.only_request();
    assert_eq!(request.target, "/crm/v3/lists");
    assert_eq!(
        request.body.unwrap(),
        json!({
            "name": "VIPs",
            "objectTypeId": "0-1",
            "processingType": "MANUAL",
        })
    );
}

#[tokio::test]
async fn create_static_list_maps_company_lists() {
    let transport = MockTransport::with_response(json!({"listId": "13"}));

    create_static_list(
        &transport,
        CreateStaticListParams {
            name: "Key accounts".to_string(),
            list_type: "companies".to_string(),
        },
    )
    .await
    .unwrap();

    let body = transport.only_request().body.unwrap();
    assert_eq!(body["objectTypeId"], "0-2");
}

#[tokio::test]
async fn create_static_list_rejects_unknown_types() {
    let transport = MockTransport::new();

    let err = create_static_list(
        &transport,
        CreateStaticListParams {
            name: "Nope".to_string(),
            list_type: "DEALS".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CrmError::Validation { .. }));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn delete_list_reports_success() {
    let transport = MockTransport::new();
    transport.enqueue_ok(204, serde_json::Value::Null);

    let result = delete_list(&transport, "12").await.unwrap();

    assert_eq!(result["message"], "List 12 deleted successfully");
    let request = transport.only_request();
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(request.target, "/crm/v3/lists/12");
}
