//! Minimal OpenAPI 3.x document model.
//!
//! Only the vocabulary the synthesis pipeline emits is modelled; optional
//! fields skip serialization entirely so the generated documents never carry
//! empty collections that strict tooling rejects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use specwitness_core::Method;

/// Which OpenAPI release the generated document declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpenApiVersion {
    #[serde(rename = "3.0")]
    V30,
    #[default]
    #[serde(rename = "3.1")]
    V31,
}

impl OpenApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpenApiVersion::V30 => "3.0.3",
            OpenApiVersion::V31 => "3.1.0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<JsonValue>,
    pub schema: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    pub schema: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseObject {
    pub description: String,
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(
        rename = "requestBody",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: IndexMap<String, ResponseObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
}

/// Method table for one route. Insertion order is preserved, which keeps
/// serialized documents reproducible across runs.
pub type PathItem = IndexMap<Method, Operation>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub openapi: String,
    pub info: Info,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
}

impl Document {
    pub fn new(version: OpenApiVersion, title: impl Into<String>) -> Self {
        Self {
            openapi: version.as_str().to_string(),
            info: Info {
                title: title.into(),
                version: "1.0.0".to_string(),
            },
            servers: Vec::new(),
            tags: Vec::new(),
            paths: IndexMap::new(),
        }
    }

    /// Canonical text form of the document.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Structured form for programmatic consumers.
    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_strings() {
        assert_eq!(OpenApiVersion::V30.as_str(), "3.0.3");
        assert_eq!(OpenApiVersion::V31.as_str(), "3.1.0");
        assert_eq!(OpenApiVersion::default(), OpenApiVersion::V31);
    }

    #[test]
    fn empty_operation_serializes_without_optional_keys() {
        let yaml = serde_yaml::to_string(&Operation::default()).unwrap();
        assert!(!yaml.contains("parameters"));
        assert!(!yaml.contains("requestBody"));
        assert!(!yaml.contains("servers"));
        assert!(!yaml.contains("tags"));
    }

    #[test]
    fn parameter_location_uses_the_in_key() {
        let parameter = Parameter {
            name: "page".to_string(),
            location: ParameterLocation::Query,
            description: "page".to_string(),
            example: None,
            schema: serde_json::json!({ "type": "integer" }),
        };
        let yaml = serde_yaml::to_string(&parameter).unwrap();
        assert!(yaml.contains("in: query"));
    }

    #[test]
    fn document_round_trips_through_yaml() {
        let mut document = Document::new(OpenApiVersion::V31, "demo");
        document.servers.push(Server::new("http://localhost:3000"));
        document.paths.insert(
            "/".to_string(),
            PathItem::from([(Method::Get, Operation::default())]),
        );
        let yaml = document.to_yaml().unwrap();
        let restored: Document = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored, document);
    }
}
