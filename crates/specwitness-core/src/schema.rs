//! Schema-expectation capability backed by the `jsonschema` engine.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// A payload failed validation against its declared schema.
#[derive(Debug, Error)]
#[error("{detail}")]
pub struct SchemaViolation {
    pub detail: String,
}

/// Declares the shape a payload must have, as a JSON Schema document,
/// optionally annotated with an observed example.
///
/// The annotation never changes what the expectation accepts; it exists so
/// downstream synthesis can surface a concrete payload in the generated
/// specification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaExpectation {
    schema: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    example: Option<JsonValue>,
}

impl SchemaExpectation {
    pub fn new(schema: JsonValue) -> Self {
        Self {
            schema,
            example: None,
        }
    }

    /// Expectation that accepts any payload.
    pub fn any() -> Self {
        Self::new(JsonValue::Object(serde_json::Map::new()))
    }

    pub fn schema(&self) -> &JsonValue {
        &self.schema
    }

    pub fn example(&self) -> Option<&JsonValue> {
        self.example.as_ref()
    }

    /// Annotated copy carrying `example` as the observed payload.
    pub fn with_example(&self, example: JsonValue) -> Self {
        Self {
            schema: self.schema.clone(),
            example: Some(example),
        }
    }

    /// Validate `value` against the declared schema.
    pub fn validate(&self, value: &JsonValue) -> Result<(), SchemaViolation> {
        let validator = jsonschema::validator_for(&self.schema).map_err(|err| SchemaViolation {
            detail: format!("invalid schema: {err}"),
        })?;
        validator.validate(value).map_err(|err| SchemaViolation {
            detail: err.to_string(),
        })
    }
}
