//! The standard operation catalog
//!
//! One entry per named operation: required arguments, optional arguments,
//! and defaults. Built once at startup; the dispatcher and the `tools/list`
//! schema generation both read from it.

use serde_json::json;

use core_kernel::{OperationCatalog, OperationSpec};

/// Builds the full catalog of CRM operations.
pub fn standard_catalog() -> OperationCatalog {
    let mut catalog = OperationCatalog::new();

    // Companies
    catalog.register(
        OperationSpec::new(
            "create_company",
            "Create a new company in the CRM with specified properties",
        )
        .require("company_name")
        .optional("domain")
        .optional("description")
        .optional("phone")
        .optional("website"),
    );
    catalog.register(
        OperationSpec::new(
            "get_company_details",
            "Get detailed information about a specific company by its ID",
        )
        .require("company_id"),
    );
    catalog.register(
        OperationSpec::new(
            "update_company",
            "Update an existing company's information",
        )
        .require("company_id")
        .optional("name")
        .optional("domain")
        .optional("industry")
        .optional("phone")
        .optional("address")
        .optional("city")
        .optional("state")
        .optional("country")
        .optional("zip_code")
        .optional("description")
        .optional("employee_count")
        .optional("revenue")
        .optional("linkedin_url")
        .optional("twitter_handle")
        .optional("website_url"),
    );
    catalog.register(
        OperationSpec::new("delete_company", "Delete a company from the CRM")
            .require("company_id"),
    );
    catalog.register(OperationSpec::new(
        "get_all_companies",
        "Retrieve all companies from the CRM",
    ));
    catalog.register(
        OperationSpec::new(
            "get_filtered_companies",
            "Get companies based on various filter criteria",
        )
        .optional("company_ids")
        .optional("created_after")
        .optional("created_before")
        .default_value("limit", json!(100)),
    );
    catalog.register(
        OperationSpec::new(
            "search_company_by_domain",
            "Search for companies by their domain name",
        )
        .require("domain")
        .default_value("limit", json!(10)),
    );
    catalog.register(
        OperationSpec::new(
            "get_recent_companies",
            "Get recently created or updated companies",
        )
        .default_value("sort_by", json!("createdate"))
        .default_value("limit", json!(10)),
    );

    // Contacts
    catalog.register(
        OperationSpec::new("create_contact", "Create a new contact in the CRM")
            .require("email")
            .require("first_name")
            .require("last_name")
            .optional("phone"),
    );
    catalog.register(
        OperationSpec::new(
            "get_contact_by_email",
            "Retrieve a contact using their email address",
        )
        .require("email"),
    );
    catalog.register(
        OperationSpec::new(
            "update_contact_by_email",
            "Update a contact using their email address as identifier",
        )
        .require("email")
        .require("properties"),
    );
    catalog.register(
        OperationSpec::new(
            "delete_contact_by_id",
            "Delete a contact using their contact ID",
        )
        .require("contact_id"),
    );
    catalog.register(
        OperationSpec::new(
            "delete_contact_by_email",
            "Delete a contact using their email address",
        )
        .require("email"),
    );
    catalog.register(
        OperationSpec::new(
            "search_contacts",
            "Search for contacts using provided filters",
        )
        .optional("email")
        .optional("firstname")
        .optional("phone")
        .default_value("limit", json!(100)),
    );
    catalog.register(OperationSpec::new(
        "get_all_contacts",
        "Retrieve all contacts from the CRM",
    ));
    catalog.register(
        OperationSpec::new(
            "get_recent_contacts",
            "Retrieve recently created or updated contacts",
        )
        .optional("since")
        .default_value("limit", json!(10)),
    );
    catalog.register(
        OperationSpec::new("add_contact_to_list", "Add a contact to a static list")
            .require("list_id")
            .require("contact_id"),
    );
    catalog.register(
        OperationSpec::new(
            "remove_contact_from_list",
            "Remove a contact from a static list",
        )
        .require("list_id")
        .require("contact_id"),
    );

    // Deals
    catalog.register(
        OperationSpec::new("create_deal", "Create a new deal in the CRM")
            .require("deal_name")
            .require("pipeline")
            .require("deal_stage")
            .optional("amount")
            .optional("close_date")
            .optional("deal_type")
            .optional("owner_id")
            .optional("associated_company_id")
            .optional("associated_contact_ids")
            .optional("custom_properties"),
    );
    catalog.register(
        OperationSpec::new("update_deal", "Update an existing deal's information")
            .require("deal_id")
            .optional("deal_name")
            .optional("amount")
            .optional("pipeline")
            .optional("deal_stage")
            .optional("close_date")
            .optional("description")
            .optional("owner_id"),
    );
    catalog.register(
        OperationSpec::new("delete_deal", "Delete a deal from the CRM").require("deal_id"),
    );
    catalog.register(
        OperationSpec::new("get_deal_by_id", "Get detailed information about a deal")
            .require("deal_id"),
    );
    catalog.register(OperationSpec::new(
        "get_all_deals",
        "Retrieve all deals from the CRM",
    ));
    catalog.register(
        OperationSpec::new(
            "search_deals",
            "Search deals by matching the query against name, pipeline, and stage",
        )
        .require("query")
        .default_value("limit", json!(10)),
    );
    catalog.register(
        OperationSpec::new(
            "get_deals_by_filters",
            "Get deals filtered by pipeline, stage, and date windows",
        )
        .optional("pipeline")
        .optional("deal_stage")
        .optional("start_date")
        .optional("end_date")
        .optional("closedate_start")
        .optional("closedate_end")
        .default_value("limit", json!(100)),
    );
    catalog.register(
        OperationSpec::new(
            "get_recent_deals",
            "Get recently created or updated deals",
        )
        .default_value("sort_by", json!("createdate"))
        .default_value("limit", json!(10)),
    );
    catalog.register(OperationSpec::new(
        "get_deal_pipelines",
        "Fetch the account's deal pipelines and their stages",
    ));

    // Tickets
    catalog.register(
        OperationSpec::new("create_ticket", "Create a support ticket")
            .require("subject")
            .require("content")
            .default_value("pipeline", json!("0"))
            .default_value("pipeline_stage", json!("1"))
            .default_value("priority", json!("MEDIUM"))
            .optional("category")
            .optional("contact_id")
            .optional("owner_id")
            .optional("source_type"),
    );
    catalog.register(
        OperationSpec::new(
            "get_ticket_by_id",
            "Fetch a ticket with all properties and associations",
        )
        .require("ticket_id"),
    );
    catalog.register(
        OperationSpec::new("update_ticket_by_id", "Update a ticket's fields")
            .require("ticket_id")
            .optional("subject")
            .optional("description")
            .optional("pipeline")
            .optional("pipeline_stage")
            .optional("priority")
            .optional("properties"),
    );
    catalog.register(
        OperationSpec::new("delete_ticket_by_id", "Delete a ticket by its ID")
            .require("ticket_id"),
    );
    catalog.register(
        OperationSpec::new("get_tickets", "Fetch tickets created inside a date range")
            .require("start_date")
            .require("end_date")
            .default_value("limit", json!(100)),
    );

    // Engagements
    catalog.register(
        OperationSpec::new(
            "create_engagement",
            "Create an engagement (task, call, email, meeting, or note)",
        )
        .require("engagement_type")
        .optional("contact_ids")
        .optional("company_id")
        .optional("deal_id")
        .optional("subject")
        .optional("body")
        .optional("status")
        .optional("start_time")
        .optional("end_time")
        .optional("task_type"),
    );
    catalog.register(
        OperationSpec::new("get_engagement", "Fetch a single engagement's details")
            .require("engagement_id"),
    );
    catalog.register(
        OperationSpec::new("delete_engagement", "Delete an engagement by its ID")
            .require("engagement_id"),
    );
    catalog.register(OperationSpec::new(
        "get_engagements",
        "Retrieve all engagements from the CRM",
    ));

    // Lists
    catalog.register(
        OperationSpec::new("create_static_list", "Create a static list")
            .require("name")
            .default_value("list_type", json!("CONTACTS")),
    );
    catalog.register(
        OperationSpec::new("delete_list", "Delete a list by its ID").require("list_id"),
    );

    catalog
}
