//! Remote admin API client with an explicit session context.
//!
//! Knows the endpoint layout, attaches the current session token to every
//! authenticated call, and turns non-success responses into
//! [`ConsoleError::Api`] carrying the server's message.

use crate::config;
use crate::error::{ConsoleError, Result};
use crate::models::{Credential, Product, ProductPayload, ProductsResponse, SessionToken};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};
use serde_json::Value;

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// The token attached to outgoing requests.
///
/// Installed at startup from the token store or after a successful login;
/// read by every authenticated call.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    token: Option<SessionToken>,
}

impl SessionContext {
    pub fn install(&mut self, token: SessionToken) {
        self.token = Some(token);
    }

    /// Raw header value sent as `Authorization`.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|t| t.token.clone())
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

pub struct ApiClient {
    api_path: String,
    transport: Box<dyn Transport>,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(api_path: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            api_path: api_path.into(),
            transport,
            session: SessionContext::default(),
        }
    }

    pub fn api_path(&self) -> &str {
        &self.api_path
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    /// Send a request and return the body of a successful response.
    fn call(&mut self, method: Method, path: String, body: Option<Value>) -> Result<Value> {
        let request = ApiRequest {
            method,
            path,
            authorization: self.session.authorization(),
            body,
        };
        log::debug!("{} {}", request.method, request.path);
        let resp = self.transport.send(&request)?;
        log::debug!("{} {} -> {}", request.method, request.path, resp.status);
        ensure_ok(resp)
    }

    /// `POST /admin/signin`.
    pub fn signin(&mut self, credential: &Credential) -> Result<SessionToken> {
        let body = self.call(
            Method::Post,
            config::SIGNIN_PATH.to_string(),
            Some(serde_json::to_value(credential)?),
        )?;
        Ok(serde_json::from_value(body)?)
    }

    /// `POST /api/user/check`. `Ok` means the current token is valid.
    pub fn check(&mut self) -> Result<()> {
        self.call(Method::Post, config::CHECK_PATH.to_string(), None)?;
        Ok(())
    }

    pub fn list_products(&mut self) -> Result<Vec<Product>> {
        let path = config::products_path(&self.api_path);
        let body = self.call(Method::Get, path, None)?;
        let resp: ProductsResponse = serde_json::from_value(body)?;
        Ok(resp.products)
    }

    pub fn create_product(&mut self, product: &Product) -> Result<()> {
        let path = config::product_path(&self.api_path);
        let payload = serde_json::to_value(ProductPayload { data: product })?;
        self.call(Method::Post, path, Some(payload))?;
        Ok(())
    }

    pub fn update_product(&mut self, id: &str, product: &Product) -> Result<()> {
        if id.is_empty() {
            return Err(ConsoleError::InvalidArgument(
                "cannot update a product without an id".to_string(),
            ));
        }
        let path = config::product_item_path(&self.api_path, id);
        let payload = serde_json::to_value(ProductPayload { data: product })?;
        self.call(Method::Put, path, Some(payload))?;
        Ok(())
    }

    pub fn delete_product(&mut self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(ConsoleError::InvalidArgument(
                "cannot delete a product without an id".to_string(),
            ));
        }
        let path = config::product_item_path(&self.api_path, id);
        self.call(Method::Delete, path, None)?;
        Ok(())
    }
}

/// Accept 2xx responses whose body does not report `success: false`.
fn ensure_ok(resp: ApiResponse) -> Result<Value> {
    let rejected = resp.body.get("success").and_then(Value::as_bool) == Some(false);
    if resp.is_success() && !rejected {
        return Ok(resp.body);
    }
    Err(ConsoleError::Api {
        status: resp.status,
        message: remote_message(&resp.body),
    })
}

/// The remote reports errors as `message`, either a string or a list of
/// strings (one per failed field).
fn remote_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}
