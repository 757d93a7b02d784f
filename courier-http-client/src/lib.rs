//! # Courier HTTP Client
//!
//! A typed API client that relays an auth token on every exchange and
//! hands back cancelable, awaitable requests.
//!
//! ## Features
//!
//! - **Token relay**: `X-Auth-Token` is read from a [`CredentialStore`] before
//!   each request and replaced when a `200 OK` response carries a fresh one
//! - **Uniform resolution**: bodies are parsed as JSON; a truthy `error` field
//!   rejects with the server's value, anything else decodes into your type
//! - **Cancelation**: every call returns a [`PendingRequest`] that can be
//!   canceled while in flight
//! - **Query encoding**: bracket-notation query strings via `courier-query`
//! - **Interceptors**: request/response hooks around every exchange
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use courier_http_client::{ApiClient, HttpClientConfig, MemoryCredentialStore};
//! use std::sync::Arc;
//!
//! #[derive(serde::Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryCredentialStore::with_token("secret"));
//!     let client = ApiClient::new(HttpClientConfig::new("https://api.example.com"), store)?;
//!
//!     let user: User = client.get("users/1", None).await?;
//!     println!("{} {}", user.id, user.name);
//!     Ok(())
//! }
//! ```
//!
//! ## Canceling
//!
//! A canceled request never settles. Its state says so, and anything still
//! awaiting it should race it against a timeout.
//!
//! ```rust,no_run
//! use courier_http_client::{ApiClient, HttpClientConfig, MemoryCredentialStore, RequestState};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(
//!         HttpClientConfig::new("https://api.example.com"),
//!         Arc::new(MemoryCredentialStore::new()),
//!     )?;
//!
//!     let mut pending = client.get::<serde_json::Value>("reports/slow", None);
//!     pending.cancel();
//!     assert_eq!(pending.state(), RequestState::Canceled);
//!
//!     let outcome = tokio::time::timeout(Duration::from_millis(100), &mut pending).await;
//!     assert!(outcome.is_err());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod credentials;
mod error;
mod form;
mod interceptor;
mod pending;
mod request;
mod response;

pub use client::ApiClient;
pub use config::{HttpClientConfig, HttpClientConfigBuilder};
pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::{ApiError, Result};
pub use form::{FormPayload, FormValue, to_form_data};
pub use interceptor::{AUTH_TOKEN_HEADER, Interceptor, TokenInterceptor};
pub use pending::{CancelHandle, PendingRequest, RequestState};
pub use request::{RequestBody, RequestDescriptor};
pub use response::Response;

// Re-export common types
pub use bytes::Bytes;
pub use courier_query::{NestedKeyOrder, QueryValue};
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use url::Url;

/// Prelude for common imports.
///
/// ```
/// use courier_http_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::ApiClient;
    pub use crate::config::{HttpClientConfig, HttpClientConfigBuilder};
    pub use crate::credentials::{CredentialStore, MemoryCredentialStore};
    pub use crate::error::{ApiError, Result};
    pub use crate::form::{FormPayload, FormValue};
    pub use crate::interceptor::{AUTH_TOKEN_HEADER, Interceptor, TokenInterceptor};
    pub use crate::pending::{CancelHandle, PendingRequest, RequestState};
    pub use crate::request::{RequestBody, RequestDescriptor};
    pub use crate::response::Response;
    pub use courier_query::{NestedKeyOrder, QueryValue};
    pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
}
