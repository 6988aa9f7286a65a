//! Deal operation handlers

use chrono::{NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use core_kernel::{collect_all, ApiRequest, CrmError, CrmTransport, Filter, Page, SearchPayload};

const DEALS_PATH: &str = "/crm/v3/objects/deals";
const DEALS_SEARCH_PATH: &str = "/crm/v3/objects/deals/search";
const DEAL_PIPELINES_PATH: &str = "/crm/v3/pipelines/deals";

/// Association type ids the CRM defines for deal links.
const DEAL_TO_COMPANY: u32 = 5;
const DEAL_TO_CONTACT: u32 = 3;

const SEARCH_PROPERTIES: &[&str] = &[
    "dealname",
    "amount",
    "pipeline",
    "dealstage",
    "createdate",
    "hs_lastmodifieddate",
    "hubspot_owner_id",
    "closedate",
];

const FILTER_PROPERTIES: &[&str] = &[
    "dealname",
    "amount",
    "closedate",
    "createdate",
    "pipeline",
    "dealstage",
    "hubspot_owner_id",
];

fn association(entity_id: &str, type_id: u32) -> Value {
    json!({
        "to": {"id": entity_id},
        "types": [{
            "associationCategory": "HUBSPOT_DEFINED",
            "associationTypeId": type_id,
        }],
    })
}

/// Parses an ISO-8601 close date (`2024-06-01T12:00:00.000Z`) into epoch
/// milliseconds, the form the CRM expects on `closedate`.
fn close_date_to_millis(close_date: &str) -> Result<i64, CrmError> {
    NaiveDateTime::parse_from_str(close_date, "%Y-%m-%dT%H:%M:%S%.fZ")
        .map(|instant| instant.and_utc().timestamp_millis())
        .map_err(|err| CrmError::validation(format!("Invalid date format: {err}")))
}

fn validate_sort_by(sort_by: &str) -> Result<(), CrmError> {
    if sort_by == "createdate" || sort_by == "hs_lastmodifieddate" {
        Ok(())
    } else {
        Err(CrmError::validation(
            "Invalid sort_by value. Use 'createdate' or 'hs_lastmodifieddate'.",
        ))
    }
}

fn insert_if_present(properties: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        properties.insert(key.to_string(), json!(value));
    }
}

fn results_of(body: &Value) -> Value {
    body.get("results").cloned().unwrap_or_else(|| json!([]))
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateDealParams {
    pub deal_name: String,
    pub pipeline: String,
    pub deal_stage: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub close_date: String,
    #[serde(default)]
    pub deal_type: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub associated_company_id: String,
    #[serde(default)]
    pub associated_contact_ids: Vec<String>,
    #[serde(default)]
    pub custom_properties: Map<String, Value>,
}

/// Creates a deal, optionally associating it with a company and contacts in
/// the same request.
pub async fn create_deal(
    transport: &dyn CrmTransport,
    params: CreateDealParams,
) -> Result<Value, CrmError> {
    let mut properties = Map::new();
    properties.insert("dealname".to_string(), json!(params.deal_name));
    properties.insert("pipeline".to_string(), json!(params.pipeline));
    properties.insert("dealstage".to_string(), json!(params.deal_stage));

    if let Some(amount) = params.amount {
        properties.insert("amount".to_string(), json!(amount.to_string()));
    }
    if !params.close_date.is_empty() {
        let millis = close_date_to_millis(&params.close_date)?;
        properties.insert("closedate".to_string(), json!(millis.to_string()));
    }
    insert_if_present(&mut properties, "dealtype", &params.deal_type);
    insert_if_present(&mut properties, "hubspot_owner_id", &params.owner_id);

    for (key, value) in params.custom_properties {
        properties.insert(key, value);
    }

    let mut payload = Map::new();
    payload.insert("properties".to_string(), Value::Object(properties));

    let mut associations = Vec::new();
    if !params.associated_company_id.is_empty() {
        associations.push(association(&params.associated_company_id, DEAL_TO_COMPANY));
    }
    for contact_id in &params.associated_contact_ids {
        associations.push(association(contact_id, DEAL_TO_CONTACT));
    }
    if !associations.is_empty() {
        payload.insert("associations".to_string(), Value::Array(associations));
    }

    info!(deal_name = %params.deal_name, "Creating deal");

    let response = transport
        .execute(ApiRequest::post(DEALS_PATH).with_body(Value::Object(payload)))
        .await?;

    info!(id = response.body.get("id").and_then(|v| v.as_str()), "Created deal");
    Ok(response.body)
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDealParams {
    pub deal_id: String,
    #[serde(default)]
    pub deal_name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub pipeline: String,
    #[serde(default)]
    pub deal_stage: String,
    #[serde(default)]
    pub close_date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner_id: String,
}

/// Patches a deal with the supplied fields, stamping the modification time.
pub async fn update_deal(
    transport: &dyn CrmTransport,
    params: UpdateDealParams,
) -> Result<Value, CrmError> {
    let mut properties = Map::new();
    insert_if_present(&mut properties, "dealname", &params.deal_name);
    insert_if_present(&mut properties, "amount", &params.amount);
    insert_if_present(&mut properties, "pipeline", &params.pipeline);
    insert_if_present(&mut properties, "dealstage", &params.deal_stage);
    insert_if_present(&mut properties, "closedate", &params.close_date);
    insert_if_present(&mut properties, "description", &params.description);
    insert_if_present(&mut properties, "hubspot_owner_id", &params.owner_id);

    properties.insert(
        "hs_lastmodifieddate".to_string(),
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
    );

    info!(deal_id = %params.deal_id, fields = properties.len(), "Updating deal");

    let response = transport
        .execute(
            ApiRequest::patch(format!("{DEALS_PATH}/{}", params.deal_id))
                .with_body(json!({ "properties": properties })),
        )
        .await?;

    Ok(response.body)
}

#[derive(Debug, Deserialize)]
pub struct SearchDealsParams {
    pub query: String,
    #[serde(default = "SearchDealsParams::default_limit")]
    pub limit: u32,
}

impl SearchDealsParams {
    fn default_limit() -> u32 {
        10
    }
}

/// Free-text deal search: the query tokens are matched against name,
/// pipeline, and stage as alternative filter groups.
pub async fn search_deals(
    transport: &dyn CrmTransport,
    params: SearchDealsParams,
) -> Result<Value, CrmError> {
    info!(query = %params.query, limit = params.limit, "Searching deals");

    let payload = SearchPayload::new()
        .group(vec![Filter::contains_token("dealname", params.query.as_str())])
        .group(vec![Filter::contains_token("pipeline", params.query.as_str())])
        .group(vec![Filter::contains_token("dealstage", params.query.as_str())])
        .properties(SEARCH_PROPERTIES)
        .sort_descending("createdate")
        .limit(params.limit)
        .build();

    let response = transport
        .execute(ApiRequest::post(DEALS_SEARCH_PATH).with_body(payload))
        .await?;

    Ok(results_of(&response.body))
}

/// Fetches the account's deal pipelines and their stages.
pub async fn get_deal_pipelines(transport: &dyn CrmTransport) -> Result<Value, CrmError> {
    info!("Fetching deal pipelines");

    let response = transport.execute(ApiRequest::get(DEAL_PIPELINES_PATH)).await?;
    Ok(response.body)
}

/// Fetches a single deal with its standard property set.
pub async fn get_deal_by_id(
    transport: &dyn CrmTransport,
    deal_id: &str,
) -> Result<Value, CrmError> {
    info!(%deal_id, "Fetching deal");

    let response = transport
        .execute(
            ApiRequest::get(format!("{DEALS_PATH}/{deal_id}")).with_query(
                "properties",
                "dealname,amount,closedate,createdate,pipeline,dealstage,hubspot_owner_id,description",
            ),
        )
        .await?;

    Ok(response.body)
}

/// Lists every deal, following the paging cursor to the end.
pub async fn get_all_deals(transport: &dyn CrmTransport) -> Result<Value, CrmError> {
    info!("Fetching all deals");

    let items = collect_all(|cursor| async move {
        let mut request = ApiRequest::get(DEALS_PATH)
            .with_query("limit", "100")
            .with_query("properties", "dealname,amount,closedate,pipeline,dealstage");
        if let Some(after) = cursor {
            request = request.with_query("after", after);
        }
        let response = transport.execute(request).await?;
        Ok(Page::from_response(&response.body))
    })
    .await?;

    info!(count = items.len(), "Retrieved deals");
    Ok(Value::Array(items))
}

#[derive(Debug, Default, Deserialize)]
pub struct DealFiltersParams {
    #[serde(default)]
    pub pipeline: String,
    #[serde(default)]
    pub deal_stage: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub closedate_start: String,
    #[serde(default)]
    pub closedate_end: String,
    #[serde(default = "DealFiltersParams::default_limit")]
    pub limit: u32,
}

impl DealFiltersParams {
    fn default_limit() -> u32 {
        100
    }
}

/// Searches deals by pipeline, stage, and date windows, following the search
/// cursor through every page of hits.
pub async fn get_deals_by_filters(
    transport: &dyn CrmTransport,
    params: DealFiltersParams,
) -> Result<Value, CrmError> {
    let mut filters = Vec::new();
    if !params.pipeline.is_empty() {
        filters.push(Filter::eq("pipeline", params.pipeline.as_str()));
    }
    if !params.deal_stage.is_empty() {
        filters.push(Filter::eq("dealstage", params.deal_stage.as_str()));
    }
    if !params.start_date.is_empty() && !params.end_date.is_empty() {
        filters.push(Filter::between(
            "createdate",
            params.start_date.as_str(),
            params.end_date.as_str(),
        ));
    }
    if !params.closedate_start.is_empty() && !params.closedate_end.is_empty() {
        filters.push(Filter::between(
            "closedate",
            params.closedate_start.as_str(),
            params.closedate_end.as_str(),
        ));
    }

    info!(filters = filters.len(), limit = params.limit, "Fetching deals by filters");

    let limit = params.limit;
    let filters_ref = &filters;
    let items = collect_all(move |cursor| async move {
        let mut payload = SearchPayload::new()
            .properties(FILTER_PROPERTIES)
            .limit(limit);
        if !filters_ref.is_empty() {
            payload = payload.group(filters_ref.clone());
        }
        if let Some(after) = cursor {
            payload = payload.after(after);
        }
        let response = transport
            .execute(ApiRequest::post(DEALS_SEARCH_PATH).with_body(payload.build()))
            .await?;
        Ok(Page::from_response(&response.body))
    })
    .await?;

    Ok(Value::Array(items))
}

#[derive(Debug, Deserialize)]
pub struct RecentDealsParams {
    #[serde(default = "RecentDealsParams::default_sort_by")]
    pub sort_by: String,
    #[serde(default = "RecentDealsParams::default_limit")]
    pub limit: u32,
}

impl RecentDealsParams {
    fn default_sort_by() -> String {
        "createdate".to_string()
    }

    fn default_limit() -> u32 {
        10
    }
}

/// Lists recently created or modified deals, most recent first.
pub async fn get_recent_deals(
    transport: &dyn CrmTransport,
    params: RecentDealsParams,
) -> Result<Value, CrmError> {
    validate_sort_by(&params.sort_by)?;

    info!(sort_by = %params.sort_by, limit = params.limit, "Fetching recent deals");

    let response = transport
        .execute(
            ApiRequest::get(DEALS_PATH)
                .with_query("limit", params.limit.to_string())
                .with_query(
                    "properties",
                    "dealname,amount,pipeline,dealstage,createdate,hs_lastmodifieddate",
                )
                .with_query("sort", format!("-{}", params.sort_by)),
        )
        .await?;

    Ok(results_of(&response.body))
}

/// Deletes a deal by id.
pub async fn delete_deal(
    transport: &dyn CrmTransport,
    deal_id: &str,
) -> Result<Value, CrmError> {
    info!(%deal_id, "Deleting deal");

    transport
        .execute(ApiRequest::delete(format!("{DEALS_PATH}/{deal_id}")))
        .await?;

    Ok(json!(format!("Successfully deleted deal with ID: {deal_id}")))
}
