//! Engagement operation handlers
//!
//! Engagements are stored per activity type: each type maps to its own v3
//! object collection. Associations to contacts, companies, and deals cannot
//! ride along on creation the way deal associations do; they are created
//! afterwards through the v4 batch endpoint once the engagement id exists.

use chrono::{Duration, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use core_kernel::{collect_all, ApiRequest, CrmError, CrmTransport, Page};

const ENGAGEMENTS_PATH: &str = "/crm/v3/objects/engagements";

/// Maps an engagement type to its v3 object collection.
fn object_type_for(engagement_type: &str) -> Result<&'static str, CrmError> {
    match engagement_type.to_uppercase().as_str() {
        "TASK" => Ok("tasks"),
        "CALL" => Ok("calls"),
        "EMAIL" => Ok("emails"),
        "MEETING" => Ok("meetings"),
        "NOTE" => Ok("notes"),
        _ => Err(CrmError::validation(format!(
            "Invalid engagement type: {engagement_type}"
        ))),
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn pending_association(from_id: &str, kind: &str) -> Value {
    json!({
        "from": {"id": from_id},
        // Filled with the engagement id once creation succeeds.
        "to": {"id": "0"},
        "type": kind,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateEngagementParams {
    pub engagement_type: String,
    #[serde(default)]
    pub contact_ids: Vec<String>,
    #[serde(default)]
    pub company_id: String,
    #[serde(default)]
    pub deal_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub task_type: String,
}

/// Creates an engagement of the requested type, then links it to the given
/// contacts, company, and deal. Association failures are logged and skipped;
/// the created engagement is still returned.
pub async fn create_engagement(
    transport: &dyn CrmTransport,
    params: CreateEngagementParams,
) -> Result<Value, CrmError> {
    let object_type = object_type_for(&params.engagement_type)?;

    let mut associations = Vec::new();
    for contact_id in &params.contact_ids {
        if !contact_id.is_empty() {
            associations.push(pending_association(contact_id, "contact_to_engagement"));
        }
    }
    if !params.company_id.is_empty() {
        associations.push(pending_association(&params.company_id, "company_to_engagement"));
    }
    if !params.deal_id.is_empty() {
        associations.push(pending_association(&params.deal_id, "deal_to_engagement"));
    }

    let mut start_time = params.start_time.clone();
    let mut end_time = params.end_time.clone();
    if object_type == "meetings" && start_time.is_empty() {
        start_time = now_iso();
    }
    if object_type == "meetings" && end_time.is_empty() {
        end_time = (Utc::now() + Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Millis, true);
    }

    let mut properties = Map::new();
    properties.insert(
        "hs_timestamp".to_string(),
        json!(if start_time.is_empty() { now_iso() } else { start_time.clone() }),
    );

    match object_type {
        "tasks" => {
            properties.insert("hs_task_subject".to_string(), json!(params.subject));
            properties.insert("hs_task_body".to_string(), json!(params.body));
            properties.insert(
                "hs_task_status".to_string(),
                json!(if params.status.is_empty() {
                    "NOT_STARTED"
                } else {
                    params.status.as_str()
                }),
            );
            properties.insert("hs_task_type".to_string(), json!(params.task_type));
        }
        "notes" => {
            properties.insert("hs_note_body".to_string(), json!(params.body));
        }
        "calls" => {
            properties.insert("hs_call_title".to_string(), json!(params.subject));
            properties.insert("hs_call_body".to_string(), json!(params.body));
            properties.insert("hs_call_status".to_string(), json!(params.status));
        }
        "meetings" => {
            properties.insert(
                "hs_meeting_title".to_string(),
                json!(if params.subject.is_empty() { "Meeting" } else { params.subject.as_str() }),
            );
            properties.insert("hs_meeting_body".to_string(), json!(params.body));
            properties.insert("hs_meeting_start_time".to_string(), json!(start_time));
            properties.insert("hs_meeting_end_time".to_string(), json!(end_time));
            properties.insert("hs_meeting_location".to_string(), json!("Virtual Meeting"));
            properties.insert("hs_meeting_outcome".to_string(), json!("SCHEDULED"));
        }
        _ => {}
    }

    info!(%object_type, "Creating engagement");

    let response = transport
        .execute(
            ApiRequest::post(format!("/crm/v3/objects/{object_type}"))
                .with_body(json!({ "properties": properties })),
        )
        .await?;

    let engagement_id = response
        .body
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(engagement_id) = engagement_id {
        for mut association in associations {
            association["to"]["id"] = json!(engagement_id.as_str());
            let outcome = transport
                .execute(
                    ApiRequest::post(format!(
                        "/crm/v4/associations/{object_type}/batch/create"
                    ))
                    .with_body(json!({ "inputs": [association] })),
                )
                .await;
            if let Err(err) = outcome {
                warn!(%engagement_id, %err, "Failed to create association");
            }
        }
    }

    Ok(response.body)
}

/// Fetches one engagement and flattens the fields callers care about.
pub async fn get_engagement(
    transport: &dyn CrmTransport,
    engagement_id: &str,
) -> Result<Value, CrmError> {
    if engagement_id.is_empty() {
        return Err(CrmError::validation("Engagement ID is required"));
    }

    info!(%engagement_id, "Fetching engagement details");

    let response = transport
        .execute(
            ApiRequest::get(format!("{ENGAGEMENTS_PATH}/{engagement_id}")).with_query(
                "properties",
                "hs_engagement_type,hs_createdate,hs_lastmodifieddate,associations",
            ),
        )
        .await?;

    let properties = response
        .body
        .get("properties")
        .cloned()
        .unwrap_or_else(|| json!({}));
    let associations = response
        .body
        .get("associations")
        .cloned()
        .unwrap_or_else(|| json!({}));

    Ok(json!({
        "id": response.body.get("id").cloned().unwrap_or(Value::Null),
        "properties": properties,
        "associations": associations,
        "hs_engagement_type": properties
            .get("hs_engagement_type")
            .cloned()
            .unwrap_or_else(|| json!("UNKNOWN")),
        "created_at": properties.get("hs_createdate").cloned().unwrap_or(Value::Null),
        "last_modified": properties.get("hs_lastmodifieddate").cloned().unwrap_or(Value::Null),
    }))
}

/// Deletes an engagement through the legacy v1 endpoint.
pub async fn delete_engagement(
    transport: &dyn CrmTransport,
    engagement_id: &str,
) -> Result<Value, CrmError> {
    if engagement_id.is_empty() {
        return Err(CrmError::validation("Engagement ID is required"));
    }

    info!(%engagement_id, "Deleting engagement");

    transport
        .execute(ApiRequest::delete(format!(
            "/engagements/v1/engagements/{engagement_id}"
        )))
        .await?;

    Ok(json!(format!("Engagement {engagement_id} deleted successfully")))
}

/// Lists every engagement, following the next-link cursor idiom: each page
/// reports the absolute URL of its successor.
pub async fn get_engagements(transport: &dyn CrmTransport) -> Result<Value, CrmError> {
    info!("Fetching all engagements");

    let items = collect_all(|cursor| async move {
        let request = match cursor {
            Some(link) if link.starts_with("http") => ApiRequest::get(link),
            Some(after) => ApiRequest::get(ENGAGEMENTS_PATH)
                .with_query("limit", "100")
                .with_query("after", after),
            None => ApiRequest::get(ENGAGEMENTS_PATH).with_query("limit", "100"),
        };
        let response = transport.execute(request).await?;
        Ok(Page::from_response_preferring_link(&response.body))
    })
    .await?;

    info!(count = items.len(), "Retrieved engagements");
    Ok(Value::Array(items))
}
