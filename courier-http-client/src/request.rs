//! Request descriptors.

use crate::{FormPayload, Result};
use http::Method;
use serde::Serialize;
use serde_json::Value;

/// Body attached to a request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Sent as JSON text.
    Json(Value),
    /// Sent as `multipart/form-data`.
    Form(FormPayload),
}

/// One request as the caller described it: verb, path relative to the API
/// origin (query string included), optional body and extra headers.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    body: Option<RequestBody>,
    headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// Create a descriptor with no body and no extra headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    /// Attach a JSON body. A payload that serializes to `null` sends no body.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)?;
        self.body = (!value.is_null()).then_some(RequestBody::Json(value));
        Ok(self)
    }

    /// Attach a multipart form body.
    pub fn with_form(mut self, form: FormPayload) -> Self {
        self.body = Some(RequestBody::Form(form));
        self
    }

    /// Add a header, applied after the auth token header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Get the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the path, relative to the API origin.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Get the caller-supplied headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
