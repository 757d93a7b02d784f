//! Request and response interceptors.

use crate::{CredentialStore, Response, Result};
use async_trait::async_trait;
use http::{HeaderName, HeaderValue};
use reqwest::Request;
use std::sync::Arc;

/// Header carrying the auth token in both directions (`X-Auth-Token`).
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// Interceptor trait for modifying requests and responses.
///
/// Request hooks run after the connection target is set and before caller
/// headers are applied. Response hooks run only for `200 OK`, before the
/// body is resolved.
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Intercept and optionally modify the request before sending.
    async fn intercept_request(&self, request: Request) -> Result<Request> {
        Ok(request)
    }

    /// Intercept and optionally modify the response after receiving.
    async fn intercept_response(&self, response: Response) -> Result<Response> {
        Ok(response)
    }
}

/// Carries the auth token across every exchange and picks up rotated tokens.
///
/// Never fails a request: a missing or unusable token is skipped.
pub struct TokenInterceptor {
    store: Arc<dyn CredentialStore>,
}

impl TokenInterceptor {
    /// Create a token interceptor over a credential store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Get the credential store.
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }
}

#[async_trait]
impl Interceptor for TokenInterceptor {
    async fn intercept_request(&self, mut request: Request) -> Result<Request> {
        let Some(token) = self.store.get_token().filter(|t| !t.is_empty()) else {
            return Ok(request);
        };

        match HeaderValue::from_str(&token) {
            Ok(value) => {
                request.headers_mut().insert(AUTH_TOKEN_HEADER, value);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored auth token is not a valid header value, sending without it");
            }
        }

        Ok(request)
    }

    async fn intercept_response(&self, response: Response) -> Result<Response> {
        if let Some(token) = response.header(AUTH_TOKEN_HEADER).filter(|t| !t.is_empty()) {
            tracing::debug!(url = %response.url(), "Auth token rotated by server");
            self.store.set_token(token.to_string());
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCredentialStore;
    use bytes::Bytes;
    use http::{HeaderMap, Method, StatusCode};

    fn outgoing() -> Request {
        Request::new(
            Method::GET,
            url::Url::parse("https://api.example.com/users").unwrap(),
        )
    }

    fn response_with(headers: HeaderMap) -> Response {
        Response::from_parts(
            StatusCode::OK,
            headers,
            Bytes::from_static(b"{}"),
            url::Url::parse("https://api.example.com/users").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_attaches_stored_token() {
        let interceptor = TokenInterceptor::new(Arc::new(MemoryCredentialStore::with_token("t-1")));
        let request = interceptor.intercept_request(outgoing()).await.unwrap();

        assert_eq!(request.headers().get(AUTH_TOKEN_HEADER).unwrap(), "t-1");
    }

    #[tokio::test]
    async fn test_no_token_no_header() {
        let interceptor = TokenInterceptor::new(Arc::new(MemoryCredentialStore::new()));
        let request = interceptor.intercept_request(outgoing()).await.unwrap();
        assert!(request.headers().get(AUTH_TOKEN_HEADER).is_none());

        let interceptor = TokenInterceptor::new(Arc::new(MemoryCredentialStore::with_token("")));
        let request = interceptor.intercept_request(outgoing()).await.unwrap();
        assert!(request.headers().get(AUTH_TOKEN_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_invalid_token_is_skipped() {
        let interceptor =
            TokenInterceptor::new(Arc::new(MemoryCredentialStore::with_token("bad\ntoken")));
        let request = interceptor.intercept_request(outgoing()).await.unwrap();

        assert!(request.headers().get(AUTH_TOKEN_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_same_header_both_directions() {
        let store = Arc::new(MemoryCredentialStore::with_token("t-1"));
        let interceptor = TokenInterceptor::new(store.clone());

        let request = interceptor.intercept_request(outgoing()).await.unwrap();
        let sent = request.headers().get("X-Auth-Token").unwrap().clone();
        assert_eq!(sent, "t-1");

        let mut headers = HeaderMap::new();
        headers.insert("X-Auth-Token", "t-2".parse().unwrap());
        interceptor.intercept_response(response_with(headers)).await.unwrap();
        assert_eq!(store.get_token().as_deref(), Some("t-2"));

        assert_eq!(AUTH_TOKEN_HEADER.as_str(), "x-auth-token");
    }

    #[tokio::test]
    async fn test_stores_rotated_token() {
        let store = Arc::new(MemoryCredentialStore::with_token("old"));
        let interceptor = TokenInterceptor::new(store.clone());

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_TOKEN_HEADER, "new".parse().unwrap());
        interceptor.intercept_response(response_with(headers)).await.unwrap();

        assert_eq!(store.get_token().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_missing_response_token_keeps_stored_one() {
        let store = Arc::new(MemoryCredentialStore::with_token("old"));
        let interceptor = TokenInterceptor::new(store.clone());

        interceptor
            .intercept_response(response_with(HeaderMap::new()))
            .await
            .unwrap();

        assert_eq!(store.get_token().as_deref(), Some("old"));
    }
}
