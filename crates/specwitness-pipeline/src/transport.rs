//! Transport capability and its reqwest-backed implementation.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use specwitness_core::{Method, TransportRequest, TransportResponse};
use tracing::debug;

/// A transport attempt that did not return cleanly.
///
/// Some transports surface error statuses as errors carrying the response
/// they observed; classification against the expectation table happens
/// upstream, so the response rides along here untouched.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub response: Option<TransportResponse>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(message: impl Into<String>, response: TransportResponse) -> Self {
        Self {
            message: message.into(),
            response: Some(response),
        }
    }
}

/// Issues one HTTP call. Timeouts and retries are the implementation's
/// concern; the pipeline never retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport.
///
/// Note that reqwest reports error statuses as ordinary responses, so the
/// error-carried-response path of [`TransportError`] is only exercised by
/// transports that frame them differently.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut url = reqwest::Url::parse(&request.url).map_err(|err| {
            TransportError::new(format!("invalid url '{}': {}", request.url, err))
        })?;
        for (key, value) in &request.query {
            let rendered = match value {
                JsonValue::String(text) => text.clone(),
                other => other.to_string(),
            };
            url.query_pairs_mut().append_pair(key, &rendered);
        }

        let mut builder = self.client.request(to_reqwest_method(request.method), url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;
        let status = response.status().as_u16();
        debug!(status, url = %request.url, "transport response");

        let headers: IndexMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.to_string(), value.to_string()))
            })
            .collect();
        let text = response
            .text()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;
        let body = if text.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&text).unwrap_or(JsonValue::String(text))
        };

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}
