// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`Transport`] for the tutoring backend.

use std::time::Duration;

use async_trait::async_trait;
use pytutor_core::{OutboundRequest, RawResponse, Transport, TransportError, TutorError};
use reqwest::Url;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

/// Header carrying the per-ask correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Single-shot HTTP calls against the backend.
///
/// Owns a pooled `reqwest::Client`; dropping the transport releases its
/// connections.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    ask_url: Url,
    health_url: Url,
}

impl HttpTransport {
    /// Builds a transport for `base_url`.
    ///
    /// Fails with [`TutorError::Validation`] when the URL does not parse or
    /// is not http(s).
    pub fn new(
        base_url: &str,
        ask_path: &str,
        health_path: &str,
        timeout: Duration,
    ) -> Result<Self, TutorError> {
        let ask_url = endpoint_url(base_url, ask_path)?;
        let health_url = endpoint_url(base_url, health_path)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TutorError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            ask_url,
            health_url,
        })
    }

    pub fn ask_url(&self) -> &Url {
        &self.ask_url
    }

    pub fn health_url(&self) -> &Url {
        &self.health_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(self.ask_url.clone())
            .header(REQUEST_ID_HEADER, request.request_id.as_str())
            .body(request.body.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        debug!(status, body_len = body.len(), "backend responded");
        Ok(RawResponse { status, body })
    }

    async fn probe_health(&self) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        Ok(RawResponse { status, body })
    }
}

/// Joins base URL and endpoint path, validating the result.
fn endpoint_url(base_url: &str, path: &str) -> Result<Url, TutorError> {
    let joined = format!(
        "{}/{}",
        base_url.trim().trim_end_matches('/'),
        path.trim().trim_start_matches('/')
    );
    let url = Url::parse(&joined)
        .map_err(|e| TutorError::Validation(format!("invalid URL `{joined}`: {e}")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(TutorError::Validation(format!(
            "invalid URL `{joined}`: expected an http or https URL with a host"
        ))),
    }
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}
