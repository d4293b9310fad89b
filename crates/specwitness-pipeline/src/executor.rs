//! Exchange execution and outcome classification.

use crate::error::ExchangeError;
use crate::transport::{HttpTransport, Transport};
use serde_json::Value as JsonValue;
use specwitness_core::{ExchangeContract, ExchangeResult, TransportRequest, TransportResponse};
use tracing::debug;

/// Executes declared exchanges over an injected transport and classifies
/// every outcome against the contract's expectation table.
pub struct Executor<T = HttpTransport> {
    transport: T,
}

impl Executor<HttpTransport> {
    pub fn new() -> Self {
        Self {
            transport: HttpTransport::new(),
        }
    }
}

impl Default for Executor<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Executor<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Execute one contract.
    ///
    /// The expectation table, not the transport's success/failure framing,
    /// decides the outcome: a transport error that carries a response is
    /// classified exactly like a directly returned one. Only a call that
    /// produced no response at all is a transport failure.
    pub async fn execute(
        &self,
        contract: ExchangeContract,
    ) -> Result<ExchangeResult, ExchangeError> {
        if contract.expect.is_empty() {
            return Err(ExchangeError::EmptyExpectations(contract.name));
        }
        debug!(
            name = %contract.name,
            method = contract.method.as_str(),
            url = %contract.url,
            "executing exchange"
        );

        let request = TransportRequest::from(&contract);
        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(failure) => match failure.response {
                Some(response) => response,
                None => return Err(ExchangeError::Transport(failure.message)),
            },
        };

        classify(contract, response)
    }
}

fn classify(
    mut contract: ExchangeContract,
    response: TransportResponse,
) -> Result<ExchangeResult, ExchangeError> {
    let status = response.status;
    let Some(expectation) = contract.expect.get(&status) else {
        return Err(ExchangeError::UnexpectedStatus { status });
    };

    expectation
        .body
        .validate(&response.body)
        .map_err(|violation| ExchangeError::SchemaMismatch {
            status,
            detail: violation.to_string(),
        })?;

    if let Some(header_expectation) = &expectation.headers {
        let observed: serde_json::Map<String, JsonValue> = response
            .headers
            .iter()
            .map(|(key, value)| (key.clone(), JsonValue::String(value.clone())))
            .collect();
        header_expectation
            .validate(&JsonValue::Object(observed))
            .map_err(|violation| ExchangeError::SchemaMismatch {
                status,
                detail: format!("headers: {violation}"),
            })?;
    }

    // Annotate the matched expectation with the observed payload so that
    // downstream synthesis can surface a concrete example.
    if let Some(expectation) = contract.expect.get_mut(&status) {
        expectation.body = expectation.body.with_example(response.body.clone());
    }

    Ok(ExchangeResult {
        data: response.body,
        status,
        request: contract,
    })
}
