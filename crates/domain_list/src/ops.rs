//! Static-list operation handlers

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use core_kernel::{ApiRequest, CrmError, CrmTransport};

const LISTS_PATH: &str = "/crm/v3/lists";

/// Maps a list type to the CRM's object type id.
fn object_type_id(list_type: &str) -> Result<&'static str, CrmError> {
    match list_type.to_uppercase().as_str() {
        "CONTACTS" => Ok("0-1"),
        "COMPANIES" => Ok("0-2"),
        other => Err(CrmError::validation(format!(
            "Invalid list type: '{other}'. Use 'CONTACTS' or 'COMPANIES'."
        ))),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateStaticListParams {
    pub name: String,
    #[serde(default = "CreateStaticListParams::default_list_type")]
    pub list_type: String,
}

impl CreateStaticListParams {
    fn default_list_type() -> String {
        "CONTACTS".to_string()
    }
}

/// Creates a manually processed (static) list.
pub async fn create_static_list(
    transport: &dyn CrmTransport,
    params: CreateStaticListParams,
) -> Result<Value, CrmError> {
    let object_type = object_type_id(&params.list_type)?;

    info!(name = %params.name, list_type = %params.list_type, "Creating static list");

    let response = transport
        .execute(ApiRequest::post(LISTS_PATH).with_body(json!({
            "name": params.name,
            "objectTypeId": object_type,
            "processingType": "MANUAL",
        })))
        .await?;

    Ok(json!({
        "status": "success",
        "list": response.body,
    }))
}

/// Deletes a list by id.
pub async fn delete_list(
    transport: &dyn CrmTransport,
    list_id: &str,
) -> Result<Value, CrmError> {
    info!(%list_id, "Deleting list");

    transport
        .execute(ApiRequest::delete(format!("{LISTS_PATH}/{list_id}")))
        .await?;

    Ok(json!({
        "status": "success",
        "message": format!("List {list_id} deleted successfully"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_type_ids_cover_both_list_kinds() {
        assert_eq!(object_type_id("CONTACTS").unwrap(), "0-1");
        assert_eq!(object_type_id("companies").unwrap(), "0-2");
        assert!(object_type_id("DEALS").is_err());
    }
}
