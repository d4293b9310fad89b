//! Fragment synthesis: one validated exchange becomes one minimal OpenAPI
//! document with exactly one path and one method.

use crate::document::{
    Document, MediaType, OpenApiVersion, Operation, Parameter, ParameterLocation, PathItem,
    RequestBody, ResponseObject, Server, Tag,
};
use crate::error::{OpenApiError, OpenApiResult};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use specwitness_core::{infer_schema, ExchangeResult, Method};
use url::{Position, Url};

/// The synthesis output for exactly one exchange, in dual representation:
/// canonical YAML text plus the structured document.
///
/// Built only by [`synthesize`], which guarantees exactly one path carrying
/// exactly one method. The aggregator relies on that invariant.
#[derive(Debug, Clone)]
pub struct Fragment {
    yaml: String,
    doc: Document,
    path: String,
    method: Method,
}

impl Fragment {
    pub fn yaml(&self) -> &str {
        &self.yaml
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The single (path, method, operation) entry this fragment contributes.
    pub fn sole_entry(&self) -> OpenApiResult<(&str, Method, &Operation)> {
        let operation = self
            .doc
            .paths
            .get(&self.path)
            .and_then(|item| item.get(&self.method))
            .ok_or_else(|| {
                OpenApiError::MalformedFragment(format!(
                    "missing operation for {} {}",
                    self.method, self.path
                ))
            })?;
        Ok((&self.path, self.method, operation))
    }
}

/// Synthesize a fragment from one validated exchange, targeting the default
/// OpenAPI version.
pub fn synthesize(result: &ExchangeResult) -> OpenApiResult<Fragment> {
    synthesize_with_version(result, OpenApiVersion::default())
}

/// Synthesize a fragment from one validated exchange.
pub fn synthesize_with_version(
    result: &ExchangeResult,
    version: OpenApiVersion,
) -> OpenApiResult<Fragment> {
    let request = &result.request;
    let parsed = Url::parse(&request.url).map_err(|err| OpenApiError::InvalidUrl {
        url: request.url.clone(),
        reason: err.to_string(),
    })?;
    // Only the path segment identifies the route; scheme, host and query
    // stay out of the key.
    let path = parsed.path().to_string();
    let base_url = parsed[..Position::BeforePath].to_string();
    let content_type = request.content_type().to_string();

    let mut parameters = Vec::new();
    if let Some(query) = &request.query {
        for (key, value) in query {
            parameters.push(parameter(key, value.clone(), ParameterLocation::Query));
        }
    }
    if let Some(headers) = &request.headers {
        for (key, value) in headers {
            parameters.push(parameter(
                key,
                JsonValue::String(value.clone()),
                ParameterLocation::Header,
            ));
        }
    }

    let request_body = request.body.as_ref().map(|body| RequestBody {
        content: media(&content_type, infer_schema(Some(body))),
    });

    // The observed payload rides along as a literal example inside the
    // inferred schema.
    let mut response_schema = infer_schema(Some(&result.data));
    if let Some(schema) = response_schema.as_object_mut() {
        schema.insert(
            "examples".to_string(),
            JsonValue::Array(vec![result.data.clone()]),
        );
    }
    let mut responses = IndexMap::new();
    responses.insert(
        result.status.to_string(),
        ResponseObject {
            description: format!("Response {} - {}", result.status, request.name),
            content: media(&content_type, response_schema),
        },
    );

    let operation = Operation {
        tags: vec![request.name.clone()],
        parameters: if parameters.is_empty() {
            // absent, never an empty list
            None
        } else {
            Some(parameters)
        },
        request_body,
        responses,
        servers: Vec::new(),
    };

    let mut doc = Document::new(version, &request.name);
    doc.servers.push(Server::new(base_url));
    doc.tags.push(Tag {
        name: request.name.clone(),
        // the linter rejects empty descriptions, so the name doubles as one
        description: request.name.clone(),
    });
    doc.paths.insert(
        path.clone(),
        PathItem::from([(request.method, operation)]),
    );

    let yaml = doc.to_yaml()?;
    Ok(Fragment {
        yaml,
        doc,
        path,
        method: request.method,
    })
}

fn parameter(key: &str, example: JsonValue, location: ParameterLocation) -> Parameter {
    Parameter {
        name: key.to_string(),
        location,
        description: key.to_string(),
        schema: infer_schema(Some(&example)),
        example: Some(example),
    }
}

fn media(content_type: &str, schema: JsonValue) -> IndexMap<String, MediaType> {
    IndexMap::from([(content_type.to_string(), MediaType { schema })])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use specwitness_core::{ExchangeContract, Expectation, SchemaExpectation};
    use std::collections::BTreeMap;

    fn sample_result() -> ExchangeResult {
        ExchangeResult {
            data: json!({ "root": true }),
            status: 200,
            request: ExchangeContract {
                name: "rootEndpoint".to_string(),
                url: "http://localhost:3000/?debug=1".to_string(),
                method: Method::Post,
                query: Some(indexmap::IndexMap::from([(
                    "query".to_string(),
                    json!("string"),
                )])),
                body: Some(json!({ "body": "string" })),
                headers: Some(indexmap::IndexMap::from([
                    ("Content-Type".to_string(), "application/json".to_string()),
                    ("hack".to_string(), "The planet".to_string()),
                ])),
                expect: BTreeMap::from([(200, Expectation::body(SchemaExpectation::any()))]),
            },
        }
    }

    #[test]
    fn fragment_has_exactly_one_path_and_method() {
        let fragment = synthesize(&sample_result()).unwrap();
        assert_eq!(fragment.document().paths.len(), 1);
        let (path, method, _) = fragment.sole_entry().unwrap();
        assert_eq!(path, "/");
        assert_eq!(method, Method::Post);
        assert_eq!(fragment.document().paths["/"].len(), 1);
    }

    #[test]
    fn query_is_excluded_from_the_path_key() {
        let fragment = synthesize(&sample_result()).unwrap();
        assert_eq!(fragment.path(), "/");
        assert_eq!(
            fragment.document().servers,
            vec![Server::new("http://localhost:3000")]
        );
    }

    #[test]
    fn parameters_cover_query_and_headers() {
        let fragment = synthesize(&sample_result()).unwrap();
        let (_, _, operation) = fragment.sole_entry().unwrap();
        let parameters = operation.parameters.as_ref().unwrap();
        assert_eq!(parameters.len(), 3);
        assert_eq!(parameters[0].name, "query");
        assert_eq!(parameters[0].location, ParameterLocation::Query);
        assert_eq!(parameters[0].description, "query");
        assert_eq!(parameters[1].location, ParameterLocation::Header);
        assert_eq!(parameters[2].example, Some(json!("The planet")));
    }

    #[test]
    fn no_query_and_no_headers_means_no_parameters_key() {
        let mut result = sample_result();
        result.request.query = None;
        result.request.headers = None;
        result.request.body = None;
        let fragment = synthesize(&result).unwrap();
        let (_, _, operation) = fragment.sole_entry().unwrap();
        assert!(operation.parameters.is_none());
        assert!(operation.request_body.is_none());
        assert!(!fragment.yaml().contains("parameters"));
    }

    #[test]
    fn response_carries_description_and_example() {
        let fragment = synthesize(&sample_result()).unwrap();
        let (_, _, operation) = fragment.sole_entry().unwrap();
        let response = &operation.responses["200"];
        assert_eq!(response.description, "Response 200 - rootEndpoint");
        let schema = &response.content["application/json"].schema;
        assert_eq!(schema["examples"], json!([{ "root": true }]));
        assert_eq!(schema["type"], json!("object"));
    }

    #[test]
    fn tag_description_is_never_empty() {
        let fragment = synthesize(&sample_result()).unwrap();
        let tag = &fragment.document().tags[0];
        assert_eq!(tag.name, "rootEndpoint");
        assert_eq!(tag.description, "rootEndpoint");
    }

    #[test]
    fn invalid_url_is_reported() {
        let mut result = sample_result();
        result.request.url = "not a url".to_string();
        assert!(matches!(
            synthesize(&result),
            Err(OpenApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn version_selects_the_openapi_field() {
        let fragment = synthesize_with_version(&sample_result(), OpenApiVersion::V30).unwrap();
        assert_eq!(fragment.document().openapi, "3.0.3");
    }
}
