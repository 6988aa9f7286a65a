//! Search payload construction
//!
//! Every search-style CRM endpoint takes the same request shape:
//! `{filterGroups: [{filters: [...]}], properties, sorts, limit, after}`.
//! Handlers assemble it through this builder instead of each repeating the
//! nesting by hand.

use serde_json::{json, Map, Value};

/// One property filter inside a filter group.
#[derive(Debug, Clone)]
pub struct Filter {
    property: &'static str,
    operator: &'static str,
    value: Option<Value>,
    high_value: Option<Value>,
    values: Option<Vec<Value>>,
}

impl Filter {
    /// Equality filter.
    pub fn eq(property: &'static str, value: impl Into<Value>) -> Self {
        Self::with_operator(property, "EQ", value)
    }

    /// Greater-than-or-equal filter.
    pub fn gte(property: &'static str, value: impl Into<Value>) -> Self {
        Self::with_operator(property, "GTE", value)
    }

    /// Less-than-or-equal filter.
    pub fn lte(property: &'static str, value: impl Into<Value>) -> Self {
        Self::with_operator(property, "LTE", value)
    }

    /// Token-containment filter used by free-text searches.
    pub fn contains_token(property: &'static str, value: impl Into<Value>) -> Self {
        Self::with_operator(property, "CONTAINS_TOKEN", value)
    }

    /// Range filter with an upper bound.
    pub fn between(
        property: &'static str,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        Self {
            property,
            operator: "BETWEEN",
            value: Some(low.into()),
            high_value: Some(high.into()),
            values: None,
        }
    }

    /// Membership filter over a list of values.
    pub fn within(property: &'static str, values: Vec<Value>) -> Self {
        Self {
            property,
            operator: "IN",
            value: None,
            high_value: None,
            values: Some(values),
        }
    }

    fn with_operator(property: &'static str, operator: &'static str, value: impl Into<Value>) -> Self {
        Self {
            property,
            operator,
            value: Some(value.into()),
            high_value: None,
            values: None,
        }
    }

    fn to_value(&self) -> Value {
        let mut filter = Map::new();
        filter.insert("propertyName".to_string(), json!(self.property));
        filter.insert("operator".to_string(), json!(self.operator));
        if let Some(value) = &self.value {
            filter.insert("value".to_string(), value.clone());
        }
        if let Some(high) = &self.high_value {
            filter.insert("highValue".to_string(), high.clone());
        }
        if let Some(values) = &self.values {
            filter.insert("values".to_string(), Value::Array(values.clone()));
        }
        Value::Object(filter)
    }
}

/// Builder for a search request body.
#[derive(Debug, Clone, Default)]
pub struct SearchPayload {
    groups: Vec<Vec<Filter>>,
    properties: Vec<&'static str>,
    sorts: Vec<Value>,
    limit: Option<u32>,
    after: Option<String>,
}

impl SearchPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one AND-combined group of filters. Multiple groups OR together.
    pub fn group(mut self, filters: Vec<Filter>) -> Self {
        self.groups.push(filters);
        self
    }

    /// Properties to return for each hit.
    pub fn properties(mut self, properties: &[&'static str]) -> Self {
        self.properties.extend_from_slice(properties);
        self
    }

    /// Descending sort on a property (most recent first).
    pub fn sort_descending(mut self, property: &str) -> Self {
        self.sorts.push(json!({
            "propertyName": property,
            "direction": "DESCENDING",
        }));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Continuation cursor for paged searches.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    pub fn build(&self) -> Value {
        let groups: Vec<Value> = self
            .groups
            .iter()
            .map(|filters| {
                json!({
                    "filters": filters.iter().map(Filter::to_value).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut payload = Map::new();
        payload.insert("filterGroups".to_string(), Value::Array(groups));
        if !self.properties.is_empty() {
            payload.insert("properties".to_string(), json!(self.properties));
        }
        if !self.sorts.is_empty() {
            payload.insert("sorts".to_string(), Value::Array(self.sorts.clone()));
        }
        if let Some(limit) = self.limit {
            payload.insert("limit".to_string(), json!(limit));
        }
        if let Some(after) = &self.after {
            payload.insert("after".to_string(), json!(after));
        }
        Value::Object(payload)
    }
}
