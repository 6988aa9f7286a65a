//! Cursor-following pagination
//!
//! The remote CRM exposes two pagination idioms depending on the endpoint:
//! an opaque `paging.next.after` token to pass back as a query parameter, and
//! a full `paging.next.link` URL to call verbatim. Both are normalized into
//! the single `next_cursor` field here so every "list all" handler drives the
//! same loop.
//!
//! Termination invariant: the loop ends when the server stops reporting a
//! cursor. A server that hands back the same cursor twice in a row would
//! otherwise loop forever; that is treated as a protocol violation.

use std::future::Future;

use serde_json::Value;

use crate::error::CrmError;

/// One page of a remote listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub next_cursor: Option<String>,
}

impl Page {
    /// Normalizes a CRM list/search response body into a page.
    ///
    /// Items come from the `results` array; the cursor from
    /// `paging.next.after`, falling back to `paging.next.link`. An empty
    /// cursor string counts as absent.
    pub fn from_response(body: &Value) -> Self {
        Self::normalize(body, &["after", "link"])
    }

    /// Like [`Page::from_response`], but prefers the `link` URL when a page
    /// carries both. Endpoints whose callers follow the link verbatim use
    /// this form.
    pub fn from_response_preferring_link(body: &Value) -> Self {
        Self::normalize(body, &["link", "after"])
    }

    fn normalize(body: &Value, cursor_keys: &[&str]) -> Self {
        let items = body
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let next_cursor = body
            .pointer("/paging/next")
            .and_then(|next| {
                cursor_keys
                    .iter()
                    .find_map(|key| next.get(*key).and_then(Value::as_str))
            })
            .filter(|cursor| !cursor.is_empty())
            .map(str::to_string);

        Self { items, next_cursor }
    }

    /// A terminal page with no successor.
    pub fn last(items: Vec<Value>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// Drives `fetch` from the first page to the last, accumulating items.
///
/// `fetch` receives `None` for the first page and the normalized cursor for
/// every subsequent one. Fails with [`CrmError::Pagination`] when the cursor
/// sequence stalls.
pub async fn collect_all<F, Fut>(mut fetch: F) -> Result<Vec<Value>, CrmError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page, CrmError>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch(cursor.clone()).await?;
        items.extend(page.items);

        match page.next_cursor {
            Some(next) if !next.is_empty() => {
                if cursor.as_deref() == Some(next.as_str()) {
                    return Err(CrmError::pagination(format!(
                        "Pagination stalled: server returned cursor '{next}' twice in a row"
                    )));
                }
                cursor = Some(next);
            }
            _ => return Ok(items),
        }
    }
}
