//! Pre-built CRM object and paging-envelope JSON

use serde_json::{json, Value};

/// A representative company object as the CRM returns it.
pub fn sample_company(id: &str, name: &str, domain: &str) -> Value {
    json!({
        "id": id,
        "properties": {
            "name": name,
            "domain": domain,
            "createdate": "2024-03-01T09:30:00.000Z",
            "hs_lastmodifieddate": "2024-06-15T14:00:00.000Z",
        },
        "createdAt": "2024-03-01T09:30:00.000Z",
        "updatedAt": "2024-06-15T14:00:00.000Z",
        "archived": false,
    })
}

/// A representative contact object.
pub fn sample_contact(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "properties": {
            "email": email,
            "firstname": "Ada",
            "lastname": "Lovelace",
            "createdate": "2024-01-10T08:00:00.000Z",
        },
        "archived": false,
    })
}

/// A representative deal object.
pub fn sample_deal(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "properties": {
            "dealname": name,
            "pipeline": "default",
            "dealstage": "appointmentscheduled",
            "amount": "2500",
        },
        "archived": false,
    })
}

/// A search response body with a total and no paging.
pub fn search_response(results: Vec<Value>) -> Value {
    json!({
        "total": results.len(),
        "results": results,
    })
}

/// A list response page with an `after` continuation token.
pub fn page_with_after(results: Vec<Value>, after: &str) -> Value {
    json!({
        "results": results,
        "paging": {"next": {"after": after}},
    })
}

/// A list response page with a next-link continuation URL.
pub fn page_with_link(results: Vec<Value>, link: &str) -> Value {
    json!({
        "results": results,
        "paging": {"next": {"link": link}},
    })
}

/// A terminal list response page.
pub fn last_page(results: Vec<Value>) -> Value {
    json!({ "results": results })
}
