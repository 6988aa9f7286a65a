//! Tool definitions for `tools/list`
//!
//! Input schemas are generated from the catalog: the catalog knows argument
//! names, requiredness, and defaults; a small hint table supplies the JSON
//! types clients display. The schemas describe the surface — type coercion
//! still happens in the handlers.

use serde_json::{json, Map, Value};

use core_kernel::{OperationCatalog, OperationSpec};

/// JSON type hint for an argument, by naming convention.
fn type_hint(arg: &str) -> &'static str {
    match arg {
        "limit" | "employee_count" => "integer",
        "revenue" | "amount" => "number",
        "properties" | "custom_properties" => "object",
        _ if arg.ends_with("_ids") => "array",
        _ => "string",
    }
}

fn schema_for_argument(arg: &str) -> Value {
    match type_hint(arg) {
        "array" => json!({"type": "array", "items": {"type": "string"}}),
        "object" => json!({"type": "object", "additionalProperties": true}),
        other => json!({"type": other}),
    }
}

fn input_schema(spec: &OperationSpec) -> Value {
    let mut properties = Map::new();
    for arg in spec.argument_names() {
        let mut schema = schema_for_argument(arg);
        if let Some(default) = spec.default_for(arg) {
            schema["default"] = default.clone();
        }
        properties.insert(arg.to_string(), schema);
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !spec.required_args().is_empty() {
        schema.insert("required".to_string(), json!(spec.required_args()));
    }
    Value::Object(schema)
}

/// The `tools/list` payload entry for one operation.
pub fn tool_definition(spec: &OperationSpec) -> Value {
    json!({
        "name": spec.name,
        "description": spec.description,
        "inputSchema": input_schema(spec),
    })
}

/// All tool definitions, in catalog order.
pub fn tool_definitions(catalog: &OperationCatalog) -> Vec<Value> {
    catalog.iter().map(tool_definition).collect()
}
