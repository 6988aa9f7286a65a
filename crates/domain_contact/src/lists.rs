//! Static-list membership
//!
//! Membership changes go through the legacy v1 list endpoints, which address
//! contacts by `vids` rather than v3 object ids.

use serde_json::{json, Value};
use tracing::info;

use core_kernel::{ApiRequest, CrmError, CrmTransport};

fn membership_payload(contact_id: &str) -> Value {
    json!({ "vids": [contact_id] })
}

/// Adds a contact to a static list.
pub async fn add_contact_to_list(
    transport: &dyn CrmTransport,
    list_id: &str,
    contact_id: &str,
) -> Result<Value, CrmError> {
    info!(%contact_id, %list_id, "Adding contact to list");

    let response = transport
        .execute(
            ApiRequest::post(format!("/contacts/v1/lists/{list_id}/add"))
                .with_body(membership_payload(contact_id)),
        )
        .await?;

    Ok(json!({
        "status": "success",
        "response": response.body,
    }))
}

/// Removes a contact from a static list.
pub async fn remove_contact_from_list(
    transport: &dyn CrmTransport,
    list_id: &str,
    contact_id: &str,
) -> Result<Value, CrmError> {
    info!(%contact_id, %list_id, "Removing contact from list");

    let response = transport
        .execute(
            ApiRequest::post(format!("/contacts/v1/lists/{list_id}/remove"))
                .with_body(membership_payload(contact_id)),
        )
        .await?;

    Ok(json!({
        "status": "success",
        "response": response.body,
    }))
}
