//! HTTP transport seam between the console and the remote admin API.
//!
//! [`HttpTransport`] talks to the real API with a blocking `reqwest` client.
//! Tests plug in their own [`Transport`] to script responses and record the
//! requests the console sends.

use crate::error::Result;
use reqwest::blocking::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// One outgoing request, relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Raw value for the `Authorization` header.
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Status and decoded body of a response.
///
/// Bodies that are not JSON are kept as a JSON string; an empty body is
/// `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends [`ApiRequest`]s. Transport-level failures are `Err`; any HTTP status
/// is an `Ok` response.
pub trait Transport: Send {
    fn send(&mut self, request: &ApiRequest) -> Result<ApiResponse>;
}

/// Blocking `reqwest` transport for a fixed base URL.
pub struct HttpTransport {
    base_url: String,
    timeout: Option<Duration>,
    client: Option<Client>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client: None,
        }
    }

    /// Lazy HTTP client, created on first use.
    fn client(&mut self) -> Result<&Client> {
        let client = match self.client.take() {
            Some(client) => client,
            None => {
                let mut builder = Client::builder().user_agent("catalog-console");
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };
        Ok(&*self.client.insert(client))
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let client = self.client()?.clone();

        let mut builder = match request.method {
            Method::Get => client.get(&url),
            Method::Post => client.post(&url),
            Method::Put => client.put(&url),
            Method::Delete => client.delete(&url),
        };
        if let Some(token) = &request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, token.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send()?;
        let status = resp.status().as_u16();
        let text = resp.text()?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse { status, body })
    }
}
