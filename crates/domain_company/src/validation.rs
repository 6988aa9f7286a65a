//! Pre-flight validation for company arguments
//!
//! Everything here runs before any network call: the industry enum check,
//! the recent-listing sort whitelist, and domain normalization for searches.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;

use core_kernel::CrmError;

/// Industry values the CRM accepts on the `industry` property.
static VALID_INDUSTRIES: Lazy<BTreeSet<&'static str>> = Lazy::new(|| {
    BTreeSet::from([
        "ACCOUNTING",
        "AGRICULTURE",
        "APPAREL",
        "BANKING",
        "BIOTECHNOLOGY",
        "CHEMICALS",
        "COMMUNICATIONS",
        "CONSTRUCTION",
        "CONSULTING",
        "EDUCATION",
        "ELECTRONICS",
        "ENERGY",
        "ENGINEERING",
        "ENTERTAINMENT",
        "ENVIRONMENTAL",
        "FINANCE",
        "FOOD & BEVERAGE",
        "GOVERNMENT",
        "HEALTHCARE",
        "HOSPITALITY",
        "INSURANCE",
        "MACHINERY",
        "MANUFACTURING",
        "MEDIA",
        "NOT FOR PROFIT",
        "OTHER",
        "PHARMACEUTICALS",
        "REAL ESTATE",
        "RECREATION",
        "RETAIL",
        "SHIPPING",
        "SOFTWARE",
        "SPORTS",
        "TECHNOLOGY",
        "TELECOMMUNICATIONS",
        "TRANSPORTATION",
        "UTILITIES",
    ])
});

/// Validates an industry value, returning its normalized (uppercased) form.
///
/// Rejections suggest close matches where the normalized input is a
/// substring of a valid value.
pub fn validate_industry(industry: &str) -> Result<String, CrmError> {
    let normalized = industry.trim().to_uppercase();

    if VALID_INDUSTRIES.contains(normalized.as_str()) {
        return Ok(normalized);
    }

    let closest: Vec<&str> = VALID_INDUSTRIES
        .iter()
        .filter(|candidate| candidate.contains(normalized.as_str()))
        .copied()
        .collect();

    let mut message = format!("Invalid industry value: '{industry}'. ");
    if closest.is_empty() {
        let all: Vec<&str> = VALID_INDUSTRIES.iter().copied().collect();
        message.push_str(&format!("Valid values are: {}", all.join(", ")));
    } else {
        message.push_str(&format!("Did you mean one of these? {}", closest.join(", ")));
    }

    Err(CrmError::validation(message))
}

/// Whitelists the sort fields the recent-companies listing accepts.
pub fn validate_sort_by(sort_by: &str) -> Result<(), CrmError> {
    if sort_by == "createdate" || sort_by == "hs_lastmodifieddate" {
        Ok(())
    } else {
        Err(CrmError::validation(
            "Invalid sort_by value. Use 'createdate' or 'hs_lastmodifieddate'.",
        ))
    }
}

/// Normalizes a domain for equality search: strips any URL scheme and path,
/// then a leading `www.`.
pub fn normalize_domain(input: &str) -> String {
    let without_scheme = match input.split_once("://") {
        Some((_, rest)) => rest,
        None => input,
    };
    let host = without_scheme
        .split('/')
        .next()
        .unwrap_or(without_scheme);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}
