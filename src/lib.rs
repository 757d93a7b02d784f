// Courier - A typed API client for Rust
//
// This library relays an auth token across every exchange, encodes nested
// query payloads in bracket notation, and hands back cancelable requests.

// Re-export the client
pub use courier_http_client::*;

// Re-export the query encoder
pub use courier_query::{Deferred, QueryEncoder, QueryError, encode as encode_query};

// Re-export optional crates
#[cfg(feature = "config")]
pub use courier_config;

#[cfg(feature = "config")]
pub use courier_config::{ClientAppConfig, ConfigSources};

pub use async_trait::async_trait;
pub use courier_query;

// Prelude for common imports
pub mod prelude {
    pub use crate::async_trait;
    pub use courier_http_client::prelude::*;
    pub use courier_query::QueryEncoder;

    #[cfg(feature = "config")]
    pub use courier_config::{ClientAppConfig, ConfigSources};
}
