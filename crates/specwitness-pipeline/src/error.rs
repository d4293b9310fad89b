use specwitness_openapi::OpenApiError;
use std::path::PathBuf;
use thiserror::Error;

/// Per-exchange failure classification.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The call could not complete and no response was observed.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The observed status is absent from the contract's expectation table,
    /// regardless of how the transport framed the response.
    #[error("unexpected response status - {status}")]
    UnexpectedStatus { status: u16 },

    /// The status was expected but the body or headers failed validation.
    #[error("response for expected status {status} violated its schema: {detail}")]
    SchemaMismatch { status: u16, detail: String },

    /// A contract with no expected statuses can never succeed.
    #[error("contract '{0}' declares no expected statuses")]
    EmptyExpectations(String),

    /// The validated exchange could not be turned into a fragment.
    #[error("fragment synthesis failed: {0}")]
    Synthesis(String),
}

/// Failures that abort a pipeline run (per-exchange failures never do).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to persist specification to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    OpenApi(#[from] OpenApiError),
}
