//! Contact operation handlers

use chrono::DateTime;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use validator::Validate;

use core_kernel::{collect_all, ApiRequest, CrmError, CrmTransport, Filter, Page, SearchPayload};

const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";
const CONTACTS_SEARCH_PATH: &str = "/crm/v3/objects/contacts/search";

const LISTING_PROPERTIES: &str = "firstname,lastname,email,phone,company";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContactParams {
    #[validate(email)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

/// Creates a contact with the required identity fields and optional phone.
pub async fn create_contact(
    transport: &dyn CrmTransport,
    params: CreateContactParams,
) -> Result<Value, CrmError> {
    params
        .validate()
        .map_err(|err| CrmError::validation(format!("Invalid contact arguments: {err}")))?;

    let mut properties = Map::new();
    properties.insert("email".to_string(), json!(params.email));
    properties.insert("firstname".to_string(), json!(params.first_name));
    properties.insert("lastname".to_string(), json!(params.last_name));
    if !params.phone.is_empty() {
        properties.insert("phone".to_string(), json!(params.phone));
    }

    info!(email = %params.email, "Creating contact");

    let response = transport
        .execute(ApiRequest::post(CONTACTS_PATH).with_body(json!({ "properties": properties })))
        .await?;

    Ok(json!({
        "status": "success",
        "contact": response.body,
    }))
}

/// Finds the single contact matching an email address.
pub async fn get_contact_by_email(
    transport: &dyn CrmTransport,
    email: &str,
) -> Result<Value, CrmError> {
    info!(%email, "Fetching contact by email");

    let payload = SearchPayload::new()
        .group(vec![Filter::eq("email", email)])
        .build();
    let response = transport
        .execute(ApiRequest::post(CONTACTS_SEARCH_PATH).with_body(payload))
        .await?;

    let total = response.body.get("total").and_then(Value::as_u64).unwrap_or(0);
    if total == 0 {
        warn!(%email, "No contact found");
        return Err(CrmError::validation(format!(
            "No contact found with email: {email}"
        )));
    }

    let contact = response.body["results"][0].clone();
    Ok(json!({
        "status": "success",
        "contact": contact,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactByEmailParams {
    pub email: String,
    pub properties: Map<String, Value>,
}

/// Patches a contact addressed by email rather than by object id.
pub async fn update_contact_by_email(
    transport: &dyn CrmTransport,
    params: UpdateContactByEmailParams,
) -> Result<Value, CrmError> {
    if params.properties.is_empty() {
        return Err(CrmError::validation("No properties provided for update"));
    }

    info!(
        email = %params.email,
        fields = params.properties.len(),
        "Updating contact by email"
    );

    let target = format!(
        "{CONTACTS_PATH}/{}",
        urlencoding::encode(&params.email)
    );
    let response = transport
        .execute(
            ApiRequest::patch(target)
                .with_query("idProperty", "email")
                .with_body(json!({ "properties": params.properties })),
        )
        .await?;

    Ok(json!({
        "status": "success",
        "contact": response.body,
    }))
}

/// Deletes a contact by object id.
pub async fn delete_contact_by_id(
    transport: &dyn CrmTransport,
    contact_id: &str,
) -> Result<Value, CrmError> {
    info!(%contact_id, "Deleting contact");

    transport
        .execute(ApiRequest::delete(format!("{CONTACTS_PATH}/{contact_id}")))
        .await?;

    Ok(json!({
        "status": "success",
        "message": format!("Contact {contact_id} successfully deleted"),
    }))
}

/// Deletes a contact addressed by email: search first, then delete the hit.
pub async fn delete_contact_by_email(
    transport: &dyn CrmTransport,
    email: &str,
) -> Result<Value, CrmError> {
    info!(%email, "Searching for contact to delete");

    let payload = SearchPayload::new()
        .group(vec![Filter::eq("email", email)])
        .build();
    let response = transport
        .execute(ApiRequest::post(CONTACTS_SEARCH_PATH).with_body(payload))
        .await?;

    let total = response.body.get("total").and_then(Value::as_u64).unwrap_or(0);
    if total == 0 {
        warn!(%email, "No contact found for deletion");
        return Err(CrmError::validation(format!(
            "No contact found with email: {email}"
        )));
    }

    let contact_id = response.body["results"][0]
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| CrmError::internal("search hit is missing an id"))?
        .to_string();

    info!(%contact_id, %email, "Found contact, proceeding with deletion");
    delete_contact_by_id(transport, &contact_id).await
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchContactsParams {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "SearchContactsParams::default_limit")]
    pub limit: u32,
}

impl SearchContactsParams {
    fn default_limit() -> u32 {
        100
    }
}

/// Searches contacts by any combination of email, first name, and phone.
pub async fn search_contacts(
    transport: &dyn CrmTransport,
    params: SearchContactsParams,
) -> Result<Value, CrmError> {
    let mut filters = Vec::new();
    if !params.email.is_empty() {
        filters.push(Filter::eq("email", params.email.as_str()));
    }
    if !params.firstname.is_empty() {
        filters.push(Filter::eq("firstname", params.firstname.as_str()));
    }
    if !params.phone.is_empty() {
        filters.push(Filter::eq("phone", params.phone.as_str()));
    }

    info!(filters = filters.len(), limit = params.limit, "Searching contacts");

    let payload = SearchPayload::new()
        .group(filters)
        .properties(&["email", "firstname", "phone"])
        .limit(params.limit)
        .build();
    let response = transport
        .execute(ApiRequest::post(CONTACTS_SEARCH_PATH).with_body(payload))
        .await?;

    let total = response.body.get("total").and_then(Value::as_u64).unwrap_or(0);
    let contacts = response
        .body
        .get("results")
        .cloned()
        .unwrap_or_else(|| json!([]));

    Ok(json!({
        "status": "success",
        "total": total,
        "contacts": contacts,
    }))
}

/// Lists every contact, following the paging cursor to the end.
pub async fn get_all_contacts(transport: &dyn CrmTransport) -> Result<Value, CrmError> {
    info!("Fetching all contacts");

    let items = collect_all(|cursor| async move {
        let mut request = ApiRequest::get(CONTACTS_PATH)
            .with_query("limit", "100")
            .with_query("properties", LISTING_PROPERTIES);
        if let Some(after) = cursor {
            request = request.with_query("after", after);
        }
        let response = transport.execute(request).await?;
        Ok(Page::from_response(&response.body))
    })
    .await?;

    info!(count = items.len(), "Retrieved contacts");
    Ok(Value::Array(items))
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentContactsParams {
    #[serde(default)]
    pub since: String,
    #[serde(default = "RecentContactsParams::default_limit")]
    pub limit: u32,
}

impl RecentContactsParams {
    fn default_limit() -> u32 {
        10
    }
}

/// Parses an ISO-8601 instant to epoch milliseconds; `None` when unparseable.
fn since_to_millis(since: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(since)
        .ok()
        .map(|instant| instant.timestamp_millis())
}

/// Lists recently modified contacts, newest first, optionally bounded below
/// by a modification instant. An unparseable `since` is dropped rather than
/// rejected, matching the listing's lenient contract.
pub async fn get_recent_contacts(
    transport: &dyn CrmTransport,
    params: RecentContactsParams,
) -> Result<Value, CrmError> {
    let mut payload = SearchPayload::new()
        .sort_descending("lastmodifieddate")
        .limit(params.limit);

    match since_to_millis(&params.since) {
        Some(millis) => {
            info!(since = %params.since, limit = params.limit, "Fetching recent contacts");
            payload = payload.group(vec![Filter::gte(
                "lastmodifieddate",
                millis.to_string(),
            )]);
        }
        None => {
            if !params.since.is_empty() {
                warn!(since = %params.since, "Ignoring unparseable 'since' value");
            }
            info!(limit = params.limit, "Fetching recent contacts");
        }
    }

    let response = transport
        .execute(ApiRequest::post(CONTACTS_SEARCH_PATH).with_body(payload.build()))
        .await?;

    let total = response.body.get("total").and_then(Value::as_u64).unwrap_or(0);
    let contacts = response
        .body
        .get("results")
        .cloned()
        .unwrap_or_else(|| json!([]));

    Ok(json!({
        "status": "success",
        "total": total,
        "contacts": contacts,
    }))
}
