use crate::schema::SchemaExpectation;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// HTTP methods a contract may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validators a contract associates with one expected status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expectation {
    pub body: SchemaExpectation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<SchemaExpectation>,
}

impl Expectation {
    pub fn body(body: SchemaExpectation) -> Self {
        Self {
            body,
            headers: None,
        }
    }
}

/// One declared HTTP interaction: where to call, what to send and which
/// responses count as correct.
///
/// The `expect` table maps status codes to validators; it must be non-empty,
/// since a contract with no expected statuses can never succeed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeContract {
    pub name: String,
    pub url: String,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<IndexMap<String, JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    pub expect: BTreeMap<u16, Expectation>,
}

impl ExchangeContract {
    /// Declared content type, defaulting to JSON when the contract carries
    /// no content-type header.
    pub fn content_type(&self) -> &str {
        self.headers
            .as_ref()
            .and_then(|headers| {
                headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
                    .map(|(_, value)| value.as_str())
            })
            .unwrap_or("application/json")
    }
}

/// Outcome of a successfully executed and validated exchange.
///
/// `status` is always a key of the originating contract's `expect` table.
/// `request` echoes the contract, with the matched expectation's body
/// validator replaced by a copy annotated with the observed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeResult {
    pub data: JsonValue,
    pub status: u16,
    pub request: ExchangeContract,
}

/// What the transport collaborator needs to issue one call.
#[derive(Debug, Clone, Serialize)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub query: IndexMap<String, JsonValue>,
    pub body: Option<JsonValue>,
    pub headers: IndexMap<String, String>,
}

impl From<&ExchangeContract> for TransportRequest {
    fn from(contract: &ExchangeContract) -> Self {
        Self {
            method: contract.method,
            url: contract.url.clone(),
            query: contract.query.clone().unwrap_or_default(),
            body: contract.body.clone(),
            headers: contract.headers.clone().unwrap_or_default(),
        }
    }
}

/// What the transport collaborator observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: IndexMap<String, String>,
    pub body: JsonValue,
}
