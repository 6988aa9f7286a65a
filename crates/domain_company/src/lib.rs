//! Company domain - operations against the CRM's company object type
//!
//! Handlers here only construct paths and payloads; authentication, timeouts,
//! and outcome classification belong to the transport adapter behind the
//! `CrmTransport` port.

pub mod ops;
pub mod validation;

pub use ops::{
    create_company, delete_company, get_all_companies, get_company_details,
    get_filtered_companies, get_recent_companies, search_company_by_domain, update_company,
    CreateCompanyParams, FilteredCompaniesParams, RecentCompaniesParams, SearchByDomainParams,
    UpdateCompanyParams,
};
pub use validation::{normalize_domain, validate_industry, validate_sort_by};
