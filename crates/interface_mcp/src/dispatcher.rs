//! Operation dispatch
//!
//! The single boundary between the wire and the handlers. `invoke` validates
//! the operation name and required arguments against the catalog, merges
//! declared defaults, routes to the handler, and folds every outcome —
//! success or any error kind — into the uniform envelope. Nothing propagates
//! past this point.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use core_kernel::{CrmError, CrmTransport, Envelope, OperationCatalog};

use crate::catalog::standard_catalog;

/// Routes named operations to their handlers.
///
/// Holds no per-call state; the only shared mutable state in the process is
/// the credential resolver's token slot inside the transport.
pub struct Dispatcher {
    catalog: OperationCatalog,
    transport: Arc<dyn CrmTransport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn CrmTransport>) -> Self {
        Self {
            catalog: standard_catalog(),
            transport,
        }
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Executes one named operation and returns its envelope.
    pub async fn invoke(&self, name: &str, arguments: Map<String, Value>) -> Envelope {
        let Some(spec) = self.catalog.lookup(name) else {
            return Envelope::error(format!("Unknown tool: {name}"));
        };

        let missing = spec.missing_required(&arguments);
        if !missing.is_empty() {
            return Envelope::error(format!(
                "Missing required arguments for {name}: {}",
                missing.join(", ")
            ));
        }

        let mut arguments = arguments;
        spec.apply_defaults(&mut arguments);

        let correlation_id = Uuid::new_v4();
        let span = info_span!("invoke", tool = name, %correlation_id);
        let outcome = self.route(name, arguments).instrument(span).await;
        Envelope::from(outcome)
    }

    async fn route(&self, name: &str, args: Map<String, Value>) -> Result<Value, CrmError> {
        let transport = self.transport.as_ref();
        match name {
            // Companies
            "create_company" => domain_company::create_company(transport, parse(args)?).await,
            "get_company_details" => {
                domain_company::get_company_details(transport, &string_arg(&args, "company_id")?)
                    .await
            }
            "update_company" => domain_company::update_company(transport, parse(args)?).await,
            "delete_company" => {
                domain_company::delete_company(transport, &string_arg(&args, "company_id")?).await
            }
            "get_all_companies" => domain_company::get_all_companies(transport).await,
            "get_filtered_companies" => {
                domain_company::get_filtered_companies(transport, parse(args)?).await
            }
            "search_company_by_domain" => {
                domain_company::search_company_by_domain(transport, parse(args)?).await
            }
            "get_recent_companies" => {
                domain_company::get_recent_companies(transport, parse(args)?).await
            }

            // Contacts
            "create_contact" => domain_contact::create_contact(transport, parse(args)?).await,
            "get_contact_by_email" => {
                domain_contact::get_contact_by_email(transport, &string_arg(&args, "email")?).await
            }
            "update_contact_by_email" => {
                domain_contact::update_contact_by_email(transport, parse(args)?).await
            }
            "delete_contact_by_id" => {
                domain_contact::delete_contact_by_id(transport, &string_arg(&args, "contact_id")?)
                    .await
            }
            "delete_contact_by_email" => {
                domain_contact::delete_contact_by_email(transport, &string_arg(&args, "email")?)
                    .await
            }
            "search_contacts" => domain_contact::search_contacts(transport, parse(args)?).await,
            "get_all_contacts" => domain_contact::get_all_contacts(transport).await,
            "get_recent_contacts" => {
                domain_contact::get_recent_contacts(transport, parse(args)?).await
            }
            "add_contact_to_list" => {
                domain_contact::add_contact_to_list(
                    transport,
                    &string_arg(&args, "list_id")?,
                    &string_arg(&args, "contact_id")?,
                )
                .await
            }
            "remove_contact_from_list" => {
                domain_contact::remove_contact_from_list(
                    transport,
                    &string_arg(&args, "list_id")?,
                    &string_arg(&args, "contact_id")?,
                )
                .await
            }

            // Deals
            "create_deal" => domain_deal::create_deal(transport, parse(args)?).await,
            "update_deal" => domain_deal::update_deal(transport, parse(args)?).await,
            "delete_deal" => {
                domain_deal::delete_deal(transport, &string_arg(&args, "deal_id")?).await
            }
            "get_deal_by_id" => {
                domain_deal::get_deal_by_id(transport, &string_arg(&args, "deal_id")?).await
            }
            "get_all_deals" => domain_deal::get_all_deals(transport).await,
            "search_deals" => domain_deal::search_deals(transport, parse(args)?).await,
            "get_deals_by_filters" => {
                domain_deal::get_deals_by_filters(transport, parse(args)?).await
            }
            "get_recent_deals" => domain_deal::get_recent_deals(transport, parse(args)?).await,
            "get_deal_pipelines" => domain_deal::get_deal_pipelines(transport).await,

            // Tickets
            "create_ticket" => domain_ticket::create_ticket(transport, parse(args)?).await,
            "get_ticket_by_id" => {
                domain_ticket::get_ticket_by_id(transport, &string_arg(&args, "ticket_id")?).await
            }
            "update_ticket_by_id" => {
                domain_ticket::update_ticket_by_id(transport, parse(args)?).await
            }
            "delete_ticket_by_id" => {
                domain_ticket::delete_ticket_by_id(transport, &string_arg(&args, "ticket_id")?)
                    .await
            }
            "get_tickets" => domain_ticket::get_tickets(transport, parse(args)?).await,

            // Engagements
            "create_engagement" => {
                domain_engagement::create_engagement(transport, parse(args)?).await
            }
            "get_engagement" => {
                domain_engagement::get_engagement(transport, &string_arg(&args, "engagement_id")?)
                    .await
            }
            "delete_engagement" => {
                domain_engagement::delete_engagement(
                    transport,
                    &string_arg(&args, "engagement_id")?,
                )
                .await
            }
            "get_engagements" => domain_engagement::get_engagements(transport).await,

            // Lists
            "create_static_list" => domain_list::create_static_list(transport, parse(args)?).await,
            "delete_list" => {
                domain_list::delete_list(transport, &string_arg(&args, "list_id")?).await
            }

            // Unreachable for cataloged names; kept so the match is total.
            other => Err(CrmError::internal(format!(
                "No handler bound for operation '{other}'"
            ))),
        }
    }
}

/// Deserializes the argument map into a handler's typed params.
fn parse<T: DeserializeOwned>(args: Map<String, Value>) -> Result<T, CrmError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|err| CrmError::validation(format!("Invalid arguments: {err}")))
}

/// Extracts a plain string argument.
fn string_arg(args: &Map<String, Value>, key: &str) -> Result<String, CrmError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CrmError::validation(format!("Argument '{key}' must be a string")))
}
