//! Company operation handlers

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use core_kernel::{collect_all, ApiRequest, CrmError, CrmTransport, Filter, Page, SearchPayload};

use crate::validation::{normalize_domain, validate_industry, validate_sort_by};

const COMPANIES_PATH: &str = "/crm/v3/objects/companies";
const COMPANIES_SEARCH_PATH: &str = "/crm/v3/objects/companies/search";

/// Properties fetched for a single-company detail read.
const DETAIL_PROPERTIES: &[&str] = &[
    "name",
    "domain",
    "createdate",
    "hs_object_id",
    "hs_lastmodifieddate",
    "industry",
    "annualrevenue",
    "numberofemployees",
    "phone",
    "address",
    "city",
    "state",
    "zip",
    "lifecyclestage",
    "hubspot_owner_id",
    "linkedin_company_page",
    "twitterhandle",
    "description",
];

const LISTING_PROPERTIES: &str = "name,domain,industry,createdate,hs_lastmodifieddate";

fn insert_if_present(properties: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        properties.insert(key.to_string(), json!(value));
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCompanyParams {
    pub company_name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
}

/// Creates a company from the non-empty properties supplied.
pub async fn create_company(
    transport: &dyn CrmTransport,
    params: CreateCompanyParams,
) -> Result<Value, CrmError> {
    let mut properties = Map::new();
    properties.insert("name".to_string(), json!(params.company_name));
    insert_if_present(&mut properties, "domain", &params.domain);
    insert_if_present(&mut properties, "description", &params.description);
    insert_if_present(&mut properties, "phone", &params.phone);
    insert_if_present(&mut properties, "website", &params.website);

    info!(company_name = %params.company_name, "Creating company");

    let response = transport
        .execute(
            ApiRequest::post(COMPANIES_PATH).with_body(json!({ "properties": properties })),
        )
        .await?;

    info!(id = response.body.get("id").and_then(|v| v.as_str()), "Created company");
    Ok(response.body)
}

/// Fetches a single company with the full detail property set.
pub async fn get_company_details(
    transport: &dyn CrmTransport,
    company_id: &str,
) -> Result<Value, CrmError> {
    info!(%company_id, "Fetching company details");

    let mut request = ApiRequest::get(format!("{COMPANIES_PATH}/{company_id}"))
        .with_query("archived", "false");
    for property in DETAIL_PROPERTIES {
        request = request.with_query("properties", *property);
    }

    let response = transport.execute(request).await?;
    Ok(response.body)
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompanyParams {
    pub company_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub employee_count: Option<i64>,
    #[serde(default)]
    pub revenue: Option<Decimal>,
    #[serde(default)]
    pub linkedin_url: String,
    #[serde(default)]
    pub twitter_handle: String,
    #[serde(default)]
    pub website_url: String,
}

/// Patches a company with the supplied fields.
///
/// The industry value is validated against the CRM's enum before anything is
/// sent; an update with no fields at all is rejected without a network call.
pub async fn update_company(
    transport: &dyn CrmTransport,
    params: UpdateCompanyParams,
) -> Result<Value, CrmError> {
    let mut properties = Map::new();
    insert_if_present(&mut properties, "name", &params.name);
    insert_if_present(&mut properties, "domain", &params.domain);
    if !params.industry.is_empty() {
        let industry = validate_industry(&params.industry)?;
        properties.insert("industry".to_string(), json!(industry));
    }
    insert_if_present(&mut properties, "phone", &params.phone);
    insert_if_present(&mut properties, "address", &params.address);
    insert_if_present(&mut properties, "city", &params.city);
    insert_if_present(&mut properties, "state", &params.state);
    insert_if_present(&mut properties, "country", &params.country);
    insert_if_present(&mut properties, "zip", &params.zip_code);
    insert_if_present(&mut properties, "description", &params.description);
    if let Some(count) = params.employee_count {
        properties.insert("numberofemployees".to_string(), json!(count.to_string()));
    }
    if let Some(revenue) = params.revenue {
        properties.insert("annualrevenue".to_string(), json!(revenue.to_string()));
    }
    insert_if_present(&mut properties, "linkedin_company_page", &params.linkedin_url);
    insert_if_present(&mut properties, "twitterhandle", &params.twitter_handle);
    insert_if_present(&mut properties, "website", &params.website_url);

    if properties.is_empty() {
        warn!(company_id = %params.company_id, "Update company called with no fields");
        return Err(CrmError::validation("No fields provided for update"));
    }

    info!(
        company_id = %params.company_id,
        fields = properties.len(),
        "Updating company"
    );

    let response = transport
        .execute(
            ApiRequest::patch(format!("{COMPANIES_PATH}/{}", params.company_id))
                .with_body(json!({ "properties": properties })),
        )
        .await?;

    Ok(response.body)
}

/// Deletes a company by id.
pub async fn delete_company(
    transport: &dyn CrmTransport,
    company_id: &str,
) -> Result<Value, CrmError> {
    info!(%company_id, "Deleting company");

    transport
        .execute(ApiRequest::delete(format!("{COMPANIES_PATH}/{company_id}")))
        .await?;

    Ok(json!({
        "message": format!("Successfully deleted company with ID: {company_id}")
    }))
}

/// Lists every company, following the paging cursor to the end.
pub async fn get_all_companies(transport: &dyn CrmTransport) -> Result<Value, CrmError> {
    info!("Fetching all companies");

    let items = collect_all(|cursor| async move {
        let mut request = ApiRequest::get(COMPANIES_PATH)
            .with_query("limit", "100")
            .with_query("properties", LISTING_PROPERTIES);
        if let Some(after) = cursor {
            request = request.with_query("after", after);
        }
        let response = transport.execute(request).await?;
        Ok(Page::from_response(&response.body))
    })
    .await?;

    info!(count = items.len(), "Retrieved companies");
    Ok(Value::Array(items))
}

#[derive(Debug, Default, Deserialize)]
pub struct FilteredCompaniesParams {
    #[serde(default)]
    pub company_ids: Vec<String>,
    #[serde(default)]
    pub created_after: String,
    #[serde(default)]
    pub created_before: String,
    #[serde(default = "FilteredCompaniesParams::default_limit")]
    pub limit: u32,
}

impl FilteredCompaniesParams {
    fn default_limit() -> u32 {
        100
    }
}

/// Searches companies by id membership and creation-date bounds.
pub async fn get_filtered_companies(
    transport: &dyn CrmTransport,
    params: FilteredCompaniesParams,
) -> Result<Value, CrmError> {
    let mut filters = Vec::new();
    if !params.company_ids.is_empty() {
        filters.push(Filter::within(
            "hs_object_id",
            params.company_ids.iter().map(|id| json!(id)).collect(),
        ));
    }
    if !params.created_after.is_empty() {
        filters.push(Filter::gte("createdate", params.created_after.as_str()));
    }
    if !params.created_before.is_empty() {
        filters.push(Filter::lte("createdate", params.created_before.as_str()));
    }

    info!(filters = filters.len(), limit = params.limit, "Fetching filtered companies");

    let payload = SearchPayload::new().group(filters).limit(params.limit).build();
    let response = transport
        .execute(ApiRequest::post(COMPANIES_SEARCH_PATH).with_body(payload))
        .await?;

    let results = response
        .body
        .get("results")
        .cloned()
        .unwrap_or_else(|| json!([]));
    Ok(results)
}

#[derive(Debug, Deserialize)]
pub struct SearchByDomainParams {
    pub domain: String,
    #[serde(default = "SearchByDomainParams::default_limit")]
    pub limit: u32,
}

impl SearchByDomainParams {
    fn default_limit() -> u32 {
        10
    }
}

/// Searches companies by domain, normalizing the input first.
pub async fn search_company_by_domain(
    transport: &dyn CrmTransport,
    params: SearchByDomainParams,
) -> Result<Value, CrmError> {
    let domain = normalize_domain(&params.domain);

    info!(%domain, "Searching for companies by domain");

    let payload = SearchPayload::new()
        .group(vec![Filter::eq("domain", domain.as_str())])
        .properties(&["name", "domain", "industry", "createdate", "hs_lastmodifieddate"])
        .limit(params.limit)
        .build();

    let response = transport
        .execute(ApiRequest::post(COMPANIES_SEARCH_PATH).with_body(payload))
        .await?;

    let results = response
        .body
        .get("results")
        .cloned()
        .unwrap_or_else(|| json!([]));
    Ok(results)
}

#[derive(Debug, Deserialize)]
pub struct RecentCompaniesParams {
    #[serde(default = "RecentCompaniesParams::default_sort_by")]
    pub sort_by: String,
    #[serde(default = "RecentCompaniesParams::default_limit")]
    pub limit: u32,
}

impl RecentCompaniesParams {
    fn default_sort_by() -> String {
        "createdate".to_string()
    }

    fn default_limit() -> u32 {
        10
    }
}

/// Lists recently created or modified companies, most recent first.
pub async fn get_recent_companies(
    transport: &dyn CrmTransport,
    params: RecentCompaniesParams,
) -> Result<Value, CrmError> {
    validate_sort_by(&params.sort_by)?;

    info!(sort_by = %params.sort_by, limit = params.limit, "Fetching recent companies");

    let response = transport
        .execute(
            ApiRequest::get(COMPANIES_PATH)
                .with_query("limit", params.limit.to_string())
                .with_query("properties", LISTING_PROPERTIES)
                .with_query("sort", format!("-{}", params.sort_by)),
        )
        .await?;

    let results = response
        .body
        .get("results")
        .cloned()
        .unwrap_or_else(|| json!([]));
    Ok(results)
}
