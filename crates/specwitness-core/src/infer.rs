//! Structural schema inference over observed runtime values.
//!
//! Pure and total: every JSON-compatible value maps to a schema that
//! validates values of the same shape. Absent input maps to the empty
//! schema (no constraints).

use serde_json::{json, Map, Value as JsonValue};

/// Infer a structural JSON Schema describing `value`.
pub fn infer_schema(value: Option<&JsonValue>) -> JsonValue {
    match value {
        None => json!({}),
        Some(value) => infer_value(value),
    }
}

fn infer_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "type": "null" }),
        JsonValue::Bool(_) => json!({ "type": "boolean" }),
        JsonValue::Number(number) => {
            if number.is_i64() || number.is_u64() {
                json!({ "type": "integer" })
            } else {
                json!({ "type": "number" })
            }
        }
        JsonValue::String(_) => json!({ "type": "string" }),
        JsonValue::Array(items) => match items.first() {
            Some(first) => json!({ "type": "array", "items": infer_value(first) }),
            None => json!({ "type": "array" }),
        },
        JsonValue::Object(fields) => {
            if fields.is_empty() {
                return json!({ "type": "object" });
            }
            let mut properties = Map::new();
            let mut required = Vec::new();
            for (key, field) in fields {
                properties.insert(key.clone(), infer_value(field));
                required.push(JsonValue::String(key.clone()));
            }
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
            })
        }
    }
}
