// crates/podium-contract/src/client.rs
// ============================================================================
// Module: Resource HTTP Client
// Description: JSON HTTP client for the Podium resource API.
// Purpose: Issue POST/GET/DELETE requests and capture a request transcript.
// Dependencies: reqwest, serde, serde_json, tracing, url
// ============================================================================

//! ## Overview
//! [`ResourceClient`] wraps a reqwest client bound to a base URL. Every request
//! is logged through `tracing` and appended to an in-memory transcript that
//! suites persist as an artifact. Requests are sent exactly once.
//! Invariants:
//! - Path segments are percent-encoded before they reach the wire.
//! - Transport failures are surfaced, never retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ContractError;
use crate::error::body_excerpt;
use crate::status::StatusClass;

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// One request/response pair issued by a [`ResourceClient`].
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    /// 1-based position in the transcript.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Request body, when one was sent.
    pub request: Option<Value>,
    /// Response status, when a response arrived.
    pub status: Option<u16>,
    /// Response body as JSON, or as a string when it is not JSON.
    pub response: Value,
    /// Transport error, when no response arrived.
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// A fully read HTTP response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Request method.
    method: Method,
    /// Request path.
    path: String,
    /// Response status.
    status: StatusCode,
    /// Raw response body.
    body: String,
}

impl ApiResponse {
    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status class.
    #[must_use]
    pub fn class(&self) -> StatusClass {
        StatusClass::classify(self.status)
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fails unless the status falls in `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::UnexpectedStatus`] on mismatch.
    pub fn expect(self, expected: StatusClass) -> Result<Self, ContractError> {
        if expected.matches(self.status) {
            return Ok(self);
        }
        Err(ContractError::UnexpectedStatus {
            method: self.method,
            path: self.path,
            expected,
            actual: self.status.as_u16(),
            body: body_excerpt(&self.body),
        })
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidBody`] when the body is not JSON.
    pub fn json(&self) -> Result<Value, ContractError> {
        serde_json::from_str(&self.body).map_err(|err| ContractError::InvalidBody {
            method: self.method.clone(),
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client for the resource API with transcript capture.
#[derive(Clone)]
pub struct ResourceClient {
    /// Base URL every path is resolved against.
    base_url: Url,
    /// Underlying HTTP client.
    client: Client,
    /// Shared request transcript.
    transcript: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl ResourceClient {
    /// Creates a client for `base_url`.
    ///
    /// Without a timeout, requests wait as long as the service takes.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when the URL is unusable or the client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ContractError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ContractError::ClientBuild)?;
        Self::new_with_client(base_url, client)
    }

    /// Creates a client from an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::InvalidBaseUrl`] when the URL is not an
    /// absolute `http`/`https` URL.
    pub fn new_with_client(base_url: &str, client: Client) -> Result<Self, ContractError> {
        let parsed = Url::parse(base_url).map_err(|err| ContractError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ContractError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "expected an absolute http or https url".to_string(),
            });
        }
        Ok(Self {
            base_url: parsed,
            client,
            transcript: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns a snapshot of the transcript entries.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Issues `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when no response arrives.
    pub async fn post(
        &self,
        segments: &[&str],
        body: &Value,
    ) -> Result<ApiResponse, ContractError> {
        self.send(Method::POST, segments, Some(body)).await
    }

    /// Issues `POST` without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when no response arrives.
    pub async fn post_empty(&self, segments: &[&str]) -> Result<ApiResponse, ContractError> {
        self.send(Method::POST, segments, None).await
    }

    /// Issues `GET`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when no response arrives.
    pub async fn get(&self, segments: &[&str]) -> Result<ApiResponse, ContractError> {
        self.send(Method::GET, segments, None).await
    }

    /// Issues `DELETE`.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when no response arrives.
    pub async fn delete(&self, segments: &[&str]) -> Result<ApiResponse, ContractError> {
        self.send(Method::DELETE, segments, None).await
    }

    /// Resolves path segments against the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ContractError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| ContractError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "url cannot carry path segments".to_string(),
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    /// Sends one request and reads the full body.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
    ) -> Result<ApiResponse, ContractError> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        debug!(%method, %path, "sending request");
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status();
                response.text().await.map(|text| (status, text))
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok((status, text)) => {
                debug!(%method, %path, status = status.as_u16(), "received response");
                let response_value =
                    serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.clone()));
                self.record(&method, &path, body, Some(status.as_u16()), response_value, None);
                Ok(ApiResponse {
                    method,
                    path,
                    status,
                    body: text,
                })
            }
            Err(source) => {
                debug!(%method, %path, error = %source, "request failed");
                self.record(&method, &path, body, None, Value::Null, Some(source.to_string()));
                Err(ContractError::Transport {
                    method,
                    path,
                    source,
                })
            }
        }
    }

    /// Appends a transcript entry.
    fn record(
        &self,
        method: &Method,
        path: &str,
        request: Option<&Value>,
        status: Option<u16>,
        response: Value,
        error: Option<String>,
    ) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            method: method.to_string(),
            path: path.to_string(),
            request: request.cloned(),
            status,
            response,
            error,
        });
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
