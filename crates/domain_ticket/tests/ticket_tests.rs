//! Handler tests for the ticket domain over a scripted transport.

use serde_json::json;

use core_kernel::{CrmError, HttpMethod};
use domain_ticket::{
    create_ticket, delete_ticket_by_id, get_ticket_by_id, get_tickets, update_ticket_by_id,
    CreateTicketParams, GetTicketsParams, UpdateTicketParams,
};
use test_utils::MockTransport;

#[tokio::test]
async fn create_ticket_applies_pipeline_defaults() {
    let transport = MockTransport::with_response(json!({"id": "55"}));

    let result = create_ticket(
        &transport,
        CreateTicketParams {
            subject: "Login broken".to_string(),
            content: "Cannot sign in since Monday".to_string(),
            pipeline: "0".to_string(),
            pipeline_stage: "1".to_string(),
            priority: "MEDIUM".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(result["status"], "success");
    assert_eq!(result["ticket"]["id"], "55");

    let body = transport.only_request().body.unwrap();
    let properties = &body["properties"];
    assert_eq!(properties["hs_pipeline"], "0");
    assert_eq!(properties["hs_pipeline_stage"], "1");
    assert_eq!(properties["hs_ticket_priority"], "MEDIUM");
    assert!(body.get("associations").is_none());
}

#[tokio::test]
async fn create_ticket_associates_the_contact() {
    let transport = MockTransport::with_response(json!({"id": "55"}));

    create_ticket(
        &transport,
        CreateTicketParams {
            subject: "Billing question".to_string(),
            content: "Refund please".to_string(),
            pipeline: "0".to_string(),
            pipeline_stage: "1".to_string(),
            priority: "MEDIUM".to_string(),
            contact_id: "7".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let body = transport.only_request().body.unwrap();
    let association = &body["associations"][0];
    assert_eq!(association["to"]["id"], "7");
    assert_eq!(association["types"][0]["associationTypeId"], 16);
}

#[tokio::test]
async fn get_ticket_requests_all_properties_and_associations() {
    let transport = MockTransport::with_response(json!({"id": "55"}));

    get_ticket_by_id(&transport, "55").await.unwrap();

    let request = transport.only_request();
    assert_eq!(request.target, "/crm/v3/objects/tickets/55");
    assert!(request
        .query
        .contains(&("properties".to_string(), "*".to_string())));
    assert!(request
        .query
        .contains(&("associations".to_string(), "contacts,companies,deals".to_string())));
}

#[tokio::test]
async fn delete_ticket_reports_success() {
    let transport = MockTransport::new();
    transport.enqueue_ok(204, serde_json::Value::Null);

    let result = delete_ticket_by_id(&transport, "55").await.unwrap();
    assert_eq!(result["message"], "Ticket 55 deleted successfully");
}

#[tokio::test]
async fn update_ticket_maps_named_fields_onto_crm_properties() {
    let transport = MockTransport::with_response(json!({"id": "55"}));

    update_ticket_by_id(
        &transport,
        UpdateTicketParams {
            ticket_id: "55".to_string(),
            description: "Escalated".to_string(),
            priority: "HIGH".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let request = transport.only_request();
    assert_eq!(request.method, HttpMethod::Patch);
    let properties = &request.body.unwrap()["properties"];
    assert_eq!(properties["content"], "Escalated");
    assert_eq!(properties["hs_ticket_priority"], "HIGH");
}

#[tokio::test]
async fn update_ticket_with_nothing_to_change_is_rejected() {
    let transport = MockTransport::new();

    let err = update_ticket_by_id(
        &transport,
        UpdateTicketParams {
            ticket_id: "55".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "No valid properties to update.");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn get_tickets_searches_the_date_window_in_millis() {
    let transport = MockTransport::with_response(json!({
        "total": 1,
        "results": [{
            "id": "55",
            "properties": {"createdate": "2024-03-05T10:00:00.000Z", "subject": "Login broken"},
        }],
    }));

    let result = get_tickets(
        &transport,
        GetTicketsParams {
            start_date: "2024-03-01T00:00:00Z".to_string(),
            end_date: "2024-03-31T23:59:59Z".to_string(),
            limit: 100,
        },
    )
    .await
    .unwrap();

    assert_eq!(result["status"], "success");
    assert_eq!(result["total"], 1);
    assert_eq!(result["tickets"][0]["created_at"], "2024-03-05T10:00:00.000Z");

    let body = transport.only_request().body.unwrap();
    let filter = &body["filterGroups"][0]["filters"][0];
    assert_eq!(filter["operator"], "BETWEEN");
    assert_eq!(filter["value"], 1_709_251_200_000i64);
    assert_eq!(filter["highValue"], 1_711_929_599_000i64);
}

#[tokio::test]
async fn get_tickets_rejects_unparseable_dates() {
    let transport = MockTransport::new();

    let err = get_tickets(
        &transport,
        GetTicketsParams {
            start_date: "March".to_string(),
            end_date: "2024-03-31T23:59:59Z".to_string(),
            limit: 100,
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, CrmError::Validation { .. }));
    assert_eq!(transport.request_count(), 0);
}
