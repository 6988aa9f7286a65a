//! Ticket operation handlers

use chrono::DateTime;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use core_kernel::{ApiRequest, CrmError, CrmTransport, Filter, SearchPayload};

const TICKETS_PATH: &str = "/crm/v3/objects/tickets";
const TICKETS_SEARCH_PATH: &str = "/crm/v3/objects/tickets/search";

/// Association type id the CRM defines for ticket-to-contact links.
const TICKET_TO_CONTACT: u32 = 16;

fn insert_if_present(properties: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        properties.insert(key.to_string(), json!(value));
    }
}

fn parse_instant(label: &str, value: &str) -> Result<i64, CrmError> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.timestamp_millis())
        .map_err(|err| CrmError::validation(format!("Invalid {label} value '{value}': {err}")))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTicketParams {
    pub subject: String,
    pub content: String,
    #[serde(default = "CreateTicketParams::default_pipeline")]
    pub pipeline: String,
    #[serde(default = "CreateTicketParams::default_pipeline_stage")]
    pub pipeline_stage: String,
    #[serde(default = "CreateTicketParams::default_priority")]
    pub priority: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub source_type: String,
}

impl CreateTicketParams {
    fn default_pipeline() -> String {
        "0".to_string()
    }

    // Stage 1 is "New" in the default support pipeline.
    fn default_pipeline_stage() -> String {
        "1".to_string()
    }

    fn default_priority() -> String {
        "MEDIUM".to_string()
    }
}

/// Creates a support ticket, optionally associated with a contact.
pub async fn create_ticket(
    transport: &dyn CrmTransport,
    params: CreateTicketParams,
) -> Result<Value, CrmError> {
    let mut properties = Map::new();
    properties.insert("subject".to_string(), json!(params.subject));
    properties.insert("content".to_string(), json!(params.content));
    properties.insert("hs_pipeline".to_string(), json!(params.pipeline));
    properties.insert("hs_pipeline_stage".to_string(), json!(params.pipeline_stage));
    properties.insert("hs_ticket_priority".to_string(), json!(params.priority));
    insert_if_present(&mut properties, "hs_ticket_category", &params.category);
    insert_if_present(&mut properties, "hubspot_owner_id", &params.owner_id);
    insert_if_present(&mut properties, "source_type", &params.source_type);

    let mut payload = Map::new();
    payload.insert("properties".to_string(), Value::Object(properties));

    if !params.contact_id.is_empty() {
        payload.insert(
            "associations".to_string(),
            json!([{
                "to": {"id": params.contact_id},
                "types": [{
                    "associationCategory": "HUBSPOT_DEFINED",
                    "associationTypeId": TICKET_TO_CONTACT,
                }],
            }]),
        );
    }

    info!(subject = %params.subject, "Creating ticket");

    let response = transport
        .execute(ApiRequest::post(TICKETS_PATH).with_body(Value::Object(payload)))
        .await?;

    Ok(json!({
        "status": "success",
        "ticket": response.body,
    }))
}

/// Fetches a single ticket with all properties and its related objects.
pub async fn get_ticket_by_id(
    transport: &dyn CrmTransport,
    ticket_id: &str,
) -> Result<Value, CrmError> {
    info!(%ticket_id, "Fetching ticket");

    let response = transport
        .execute(
            ApiRequest::get(format!("{TICKETS_PATH}/{ticket_id}"))
                .with_query("properties", "*")
                .with_query("associations", "contacts,companies,deals"),
        )
        .await?;

    Ok(json!({
        "status": "success",
        "ticket": response.body,
    }))
}

/// Deletes a ticket by id.
pub async fn delete_ticket_by_id(
    transport: &dyn CrmTransport,
    ticket_id: &str,
) -> Result<Value, CrmError> {
    info!(%ticket_id, "Deleting ticket");

    transport
        .execute(ApiRequest::delete(format!("{TICKETS_PATH}/{ticket_id}")))
        .await?;

    Ok(json!({
        "status": "success",
        "message": format!("Ticket {ticket_id} deleted successfully"),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTicketParams {
    pub ticket_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pipeline: String,
    #[serde(default)]
    pub pipeline_stage: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Patches a ticket with named fields plus any extra raw properties.
pub async fn update_ticket_by_id(
    transport: &dyn CrmTransport,
    params: UpdateTicketParams,
) -> Result<Value, CrmError> {
    let mut properties = params.properties;
    insert_if_present(&mut properties, "subject", &params.subject);
    insert_if_present(&mut properties, "content", &params.description);
    insert_if_present(&mut properties, "hs_pipeline", &params.pipeline);
    insert_if_present(&mut properties, "hs_pipeline_stage", &params.pipeline_stage);
    insert_if_present(&mut properties, "hs_ticket_priority", &params.priority);

    if properties.is_empty() {
        return Err(CrmError::validation("No valid properties to update."));
    }

    info!(ticket_id = %params.ticket_id, fields = properties.len(), "Updating ticket");

    let response = transport
        .execute(
            ApiRequest::patch(format!("{TICKETS_PATH}/{}", params.ticket_id))
                .with_body(json!({ "properties": properties })),
        )
        .await?;

    Ok(json!({
        "status": "success",
        "updated_ticket": response.body,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GetTicketsParams {
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "GetTicketsParams::default_limit")]
    pub limit: u32,
}

impl GetTicketsParams {
    fn default_limit() -> u32 {
        100
    }
}

/// Fetches tickets created inside a date window.
pub async fn get_tickets(
    transport: &dyn CrmTransport,
    params: GetTicketsParams,
) -> Result<Value, CrmError> {
    let start = parse_instant("start_date", &params.start_date)?;
    let end = parse_instant("end_date", &params.end_date)?;

    info!(start, end, limit = params.limit, "Fetching tickets in range");

    let payload = SearchPayload::new()
        .group(vec![Filter::between("createdate", start, end)])
        .limit(params.limit)
        .build();

    let response = transport
        .execute(ApiRequest::post(TICKETS_SEARCH_PATH).with_body(payload))
        .await?;

    let tickets: Vec<Value> = response
        .body
        .get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .map(|ticket| {
                    json!({
                        "id": ticket.get("id").cloned().unwrap_or(Value::Null),
                        "properties": ticket.get("properties").cloned().unwrap_or(Value::Null),
                        "created_at": ticket.pointer("/properties/createdate").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(json!({
        "status": "success",
        "tickets": tickets,
        "total": response.body.get("total").cloned().unwrap_or(json!(0)),
        "paging": response.body.get("paging").cloned().unwrap_or(json!({})),
    }))
}
