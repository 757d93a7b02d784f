//! HTTP response wrapper and resolution policy.

use crate::{ApiError, Result};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// HTTP response wrapper.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: url::Url,
}

impl Response {
    /// Create a response from a reqwest response, reading the whole body.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.bytes().await?;

        Ok(Self::from_parts(status, headers, body, url))
    }

    /// Assemble a response from its parts.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: Bytes, url: url::Url) -> Self {
        Self {
            status,
            headers,
            body,
            url,
        }
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Check if the response was successful (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.headers
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the response URL.
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    /// Get the response body as bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// Get the response body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Resolve the body into the caller's result type.
    ///
    /// The status code plays no part: a body that is not JSON is a
    /// [`ApiError::ResponseParse`], a truthy top-level `error` field is an
    /// [`ApiError::Application`] carrying that field, anything else is
    /// deserialized into `T`.
    pub fn settle<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self.text();
        let value: Value = serde_json::from_str(&raw).map_err(|e| ApiError::ResponseParse {
            message: e.to_string(),
            raw,
        })?;

        if let Some(error) = value.get("error").filter(|e| is_truthy(e)) {
            return Err(ApiError::Application(error.clone()));
        }

        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Truthiness as a browser script sees it.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
    }

    fn response(status: u16, body: &str) -> Response {
        Response::from_parts(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            Bytes::from(body.to_string()),
            url::Url::parse("https://api.example.com/users").unwrap(),
        )
    }

    #[test]
    fn test_settle_success() {
        let user: User = response(200, r#"{"id": 1, "name": "Ada"}"#).settle().unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                name: "Ada".to_string()
            }
        );
    }

    #[test]
    fn test_settle_ignores_status_code() {
        let value: Value = response(500, r#"{"ok": true}"#).settle().unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[test]
    fn test_settle_application_error_is_verbatim() {
        let err = response(200, r#"{"error": "bad input"}"#)
            .settle::<Value>()
            .unwrap_err();
        assert_eq!(err.application_error(), Some(&json!("bad input")));

        let err = response(400, r#"{"error": {"code": 12, "fields": ["name"]}}"#)
            .settle::<Value>()
            .unwrap_err();
        assert_eq!(
            err.application_error(),
            Some(&json!({"code": 12, "fields": ["name"]}))
        );
    }

    #[test]
    fn test_settle_falsy_error_field_resolves() {
        for body in [
            r#"{"error": null}"#,
            r#"{"error": false}"#,
            r#"{"error": 0}"#,
            r#"{"error": ""}"#,
        ] {
            let value: Value = response(200, body).settle().unwrap();
            assert!(value.get("error").is_some(), "{body}");
        }
    }

    #[test]
    fn test_settle_parse_error_carries_raw_text() {
        let err = response(200, "not json").settle::<Value>().unwrap_err();
        assert_eq!(err.raw_response(), Some("not json"));
        assert!(matches!(err, ApiError::ResponseParse { ref message, .. } if !message.is_empty()));
    }

    #[test]
    fn test_settle_empty_body_is_parse_error() {
        let err = response(204, "").settle::<Value>().unwrap_err();
        assert_eq!(err.raw_response(), Some(""));
    }

    #[test]
    fn test_settle_shape_mismatch() {
        let err = response(200, r#"{"id": "x"}"#).settle::<User>().unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_settle_non_object_bodies() {
        let list: Vec<u32> = response(200, "[1, 2]").settle().unwrap();
        assert_eq!(list, vec![1, 2]);

        let nothing: Option<User> = response(200, "null").settle().unwrap();
        assert!(nothing.is_none());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", "abc".parse().unwrap());
        let response = Response::from_parts(
            StatusCode::OK,
            headers,
            Bytes::new(),
            url::Url::parse("https://api.example.com").unwrap(),
        );
        assert_eq!(response.header("X-Auth-Token"), Some("abc"));
    }
}
