//! Merging many fragments into one canonical document.
//!
//! Fragments are processed in the order supplied: a later fragment for the
//! same path and method replaces the earlier operation, while other methods
//! on that path are left untouched. Callers control the final shape by
//! ordering their tasks.

use crate::document::{Document, OpenApiVersion, PathItem, Server, Tag};
use crate::error::OpenApiResult;
use crate::fragment::Fragment;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Global configuration for one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct AggregateConfig {
    pub title: String,
    pub default_servers: Vec<Server>,
    pub version: OpenApiVersion,
}

/// The canonical merged specification, in dual representation.
#[derive(Debug, Clone)]
pub struct AggregateDocument {
    yaml: String,
    doc: Document,
}

impl AggregateDocument {
    pub fn yaml(&self) -> &str {
        &self.yaml
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
        self.doc.to_json()
    }
}

/// Merge `fragments` into one document under `config`.
pub fn aggregate(fragments: &[Fragment], config: &AggregateConfig) -> OpenApiResult<AggregateDocument> {
    let mut paths: IndexMap<String, PathItem> = IndexMap::new();
    let mut servers = config.default_servers.clone();
    let mut tags: Vec<Tag> = Vec::new();

    for fragment in fragments {
        let (path, method, operation) = fragment.sole_entry()?;
        let mut operation = operation.clone();

        // Each operation advertises the globally configured servers plus its
        // own origin.
        let mut operation_servers = config.default_servers.clone();
        operation_servers.extend(fragment.document().servers.iter().cloned());
        operation.servers = dedup_servers(operation_servers);

        paths
            .entry(path.to_string())
            .or_default()
            .insert(method, operation);

        servers.extend(fragment.document().servers.iter().cloned());
        tags.extend(fragment.document().tags.iter().cloned());
    }

    let mut doc = Document::new(config.version, &config.title);
    doc.servers = dedup_servers(servers);
    doc.tags = dedup_tags(tags);
    doc.paths = paths;

    let yaml = doc.to_yaml()?;
    Ok(AggregateDocument { yaml, doc })
}

/// Collapse duplicate servers by URL, first occurrence wins.
pub fn dedup_servers(servers: Vec<Server>) -> Vec<Server> {
    let mut seen = HashSet::new();
    servers
        .into_iter()
        .filter(|server| seen.insert(server.url.clone()))
        .collect()
}

/// Collapse duplicate tags by name, first occurrence wins.
pub fn dedup_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::synthesize;
    use serde_json::json;
    use specwitness_core::{
        ExchangeContract, ExchangeResult, Expectation, Method, SchemaExpectation,
    };
    use std::collections::BTreeMap;

    fn fragment(name: &str, url: &str, method: Method, data: JsonValue) -> Fragment {
        let result = ExchangeResult {
            data,
            status: 200,
            request: ExchangeContract {
                name: name.to_string(),
                url: url.to_string(),
                method,
                query: None,
                body: None,
                headers: None,
                expect: BTreeMap::from([(200, Expectation::body(SchemaExpectation::any()))]),
            },
        };
        synthesize(&result).unwrap()
    }

    fn config() -> AggregateConfig {
        AggregateConfig {
            title: "demo".to_string(),
            default_servers: vec![Server::new("http://gateway.internal")],
            version: OpenApiVersion::default(),
        }
    }

    #[test]
    fn distinct_methods_on_one_path_are_both_kept() {
        let fragments = vec![
            fragment("a", "http://localhost:3000/x", Method::Get, json!({ "a": 1 })),
            fragment("b", "http://localhost:3000/x", Method::Post, json!({ "b": 2 })),
        ];
        let document = aggregate(&fragments, &config()).unwrap();
        let item = &document.document().paths["/x"];
        assert_eq!(item.len(), 2);
        assert!(item.contains_key(&Method::Get));
        assert!(item.contains_key(&Method::Post));
    }

    #[test]
    fn later_fragment_wins_for_the_same_path_and_method() {
        let fragments = vec![
            fragment("first", "http://localhost:3000/x", Method::Get, json!({ "v": 1 })),
            fragment("second", "http://localhost:3000/x", Method::Get, json!({ "v": 2 })),
        ];
        let document = aggregate(&fragments, &config()).unwrap();
        let item = &document.document().paths["/x"];
        assert_eq!(item.len(), 1);
        let response = &item[&Method::Get].responses["200"];
        assert_eq!(response.description, "Response 200 - second");
    }

    #[test]
    fn servers_and_tags_are_deduplicated_first_seen_wins() {
        let fragments = vec![
            fragment("a", "http://localhost:3000/x", Method::Get, json!(1)),
            fragment("a", "http://localhost:3000/y", Method::Get, json!(2)),
            fragment("b", "http://other:8080/z", Method::Get, json!(3)),
        ];
        let document = aggregate(&fragments, &config()).unwrap();
        let urls: Vec<_> = document
            .document()
            .servers
            .iter()
            .map(|s| s.url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec![
                "http://gateway.internal",
                "http://localhost:3000",
                "http://other:8080"
            ]
        );
        let names: Vec<_> = document
            .document()
            .tags
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn operations_advertise_defaults_plus_their_own_origin() {
        let fragments = vec![fragment("a", "http://localhost:3000/x", Method::Get, json!(1))];
        let document = aggregate(&fragments, &config()).unwrap();
        let operation = &document.document().paths["/x"][&Method::Get];
        assert_eq!(
            operation.servers,
            vec![
                Server::new("http://gateway.internal"),
                Server::new("http://localhost:3000")
            ]
        );
    }

    #[test]
    fn dedup_is_idempotent_and_order_preserving() {
        let servers = vec![
            Server::new("a"),
            Server::new("b"),
            Server::new("a"),
            Server::new("c"),
        ];
        let once = dedup_servers(servers);
        let twice = dedup_servers(once.clone());
        assert_eq!(once, twice);
        let urls: Vec<_> = once.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b", "c"]);
    }

    #[test]
    fn zero_fragments_yield_an_empty_document() {
        let document = aggregate(&[], &config()).unwrap();
        assert!(document.document().paths.is_empty());
        assert_eq!(document.document().servers.len(), 1);
        assert!(document.yaml().contains("openapi: 3.1.0"));
    }
}
