//! Handler tests for the engagement domain over a scripted transport.

use serde_json::json;

use core_kernel::{CrmError, HttpMethod};
use domain_engagement::{
    create_engagement, delete_engagement, get_engagement, get_engagements,
    CreateEngagementParams,
};
use test_utils::{last_page, page_with_link, MockTransport};

#[tokio::test]
async fn create_task_fills_task_properties_and_status_default() {
    let transport = MockTransport::with_response(json!({"id": "900"}));

    let result = create_engagement(
        &transport,
        CreateEngagementParams {
            engagement_type: "TASK".to_string(),
            subject: "Follow up".to_string(),
            body: "Call back about renewal".to_string(),
            task_type: "CALL".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(result["id"], "900");

    let request = transport.only_request();
    assert_eq!(request.target, "/crm/v3/objects/tasks");
    let properties = &request.body.unwrap()["properties"];
    assert_eq!(properties["hs_task_subject"], "Follow up");
    assert_eq!(properties["hs_task_status"], "NOT_STARTED");
    assert!(properties["hs_timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn create_engagement_rejects_unknown_types_before_any_call() {
    let transport = MockTransport::new();

    let err = create_engagement(
        &transport,
        CreateEngagementParams {
            engagement_type: "FAX".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Invalid engagement type: FAX");
    assert!(matches!(err, CrmError::Validation { .. }));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn create_note_links_contacts_after_creation() {
    let transport = MockTransport::new();
    transport.enqueue_ok(201, json!({"id": "900"}));
    transport.enqueue_ok(201, json!({"status": "COMPLETE"}));

    create_engagement(
        &transport,
        CreateEngagementParams {
            engagement_type: "NOTE".to_string(),
            body: "Spoke at the conference".to_string(),
            contact_ids: vec!["7".to_string()],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].target, "/crm/v3/objects/notes");
    assert_eq!(requests[1].target, "/crm/v4/associations/notes/batch/create");

    let association = &requests[1].body.as_ref().unwrap()["inputs"][0];
    assert_eq!(association["from"]["id"], "7");
    assert_eq!(association["to"]["id"], "900");
    assert_eq!(association["type"], "contact_to_engagement");
}

#[tokio::test]
async fn create_meeting_defaults_title_and_window() {
    let transport = MockTransport::with_response(json!({"id": "901"}));

    create_engagement(
        &transport,
        CreateEngagementParams {
            engagement_type: "MEETING".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let properties = &transport.only_request().body.unwrap()["properties"];
    assert_eq!(properties["hs_meeting_title"], "Meeting");
    assert_eq!(properties["hs_meeting_outcome"], "SCHEDULED");
    assert!(properties["hs_meeting_start_time"].as_str().unwrap().ends_with('Z'));
    assert!(properties["hs_meeting_end_time"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn get_engagement_flattens_type_and_timestamps() {
    let transport = MockTransport::with_response(json!({
        "id": "900",
        "properties": {
            "hs_engagement_type": "CALL",
            "hs_createdate": "2024-02-02T10:00:00Z",
            "hs_lastmodifieddate": "2024-02-03T10:00:00Z",
        },
    }));

    let result = get_engagement(&transport, "900").await.unwrap();

    assert_eq!(result["hs_engagement_type"], "CALL");
    assert_eq!(result["created_at"], "2024-02-02T10:00:00Z");
    assert_eq!(result["last_modified"], "2024-02-03T10:00:00Z");
    assert_eq!(result["associations"], json!({}));
}

#[tokio::test]
async fn get_engagement_defaults_unknown_type() {
    let transport = MockTransport::with_response(json!({"id": "900", "properties": {}}));

    let result = get_engagement(&transport, "900").await.unwrap();
    assert_eq!(result["hs_engagement_type"], "UNKNOWN");
}

#[tokio::test]
async fn delete_engagement_uses_the_legacy_endpoint() {
    let transport = MockTransport::new();
    transport.enqueue_ok(204, serde_json::Value::Null);

    let result = delete_engagement(&transport, "900").await.unwrap();

    assert_eq!(result, json!("Engagement 900 deleted successfully"));
    let request = transport.only_request();
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(request.target, "/engagements/v1/engagements/900");
}

#[tokio::test]
async fn get_engagements_follows_next_links_verbatim() {
    let transport = MockTransport::new();
    transport.enqueue_ok(
        200,
        page_with_link(
            vec![json!({"id": "1"})],
            "https://api.hubapi.com/crm/v3/objects/engagements?after=x",
        ),
    );
    transport.enqueue_ok(200, last_page(vec![json!({"id": "2"})]));

    let result = get_engagements(&transport).await.unwrap();

    assert_eq!(result.as_array().unwrap().len(), 2);
    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].target, "/crm/v3/objects/engagements");
    assert_eq!(
        requests[1].target,
        "https://api.hubapi.com/crm/v3/objects/engagements?after=x"
    );
    assert!(requests[1].is_absolute());
}
