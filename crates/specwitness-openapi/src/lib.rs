pub mod aggregate;
pub mod document;
pub mod error;
pub mod fragment;
pub mod lint;

// Re-export commonly used types
pub use aggregate::{aggregate, dedup_servers, dedup_tags, AggregateConfig, AggregateDocument};
pub use document::{
    Document, Info, MediaType, OpenApiVersion, Operation, Parameter, ParameterLocation, PathItem,
    RequestBody, ResponseObject, Server, Tag,
};
pub use error::{OpenApiError, OpenApiResult};
pub use fragment::{synthesize, synthesize_with_version, Fragment};
pub use lint::{Assertion, Diagnostic, Linter, Rule};
