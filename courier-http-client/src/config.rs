//! API client configuration.

use courier_config::ClientAppConfig;
use courier_query::NestedKeyOrder;
use std::time::Duration;

/// API client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// API origin every request path is joined onto, without a trailing slash.
    pub base_url: String,
    /// Whether API responses may be cached. Exposed to callers, not acted on.
    pub cache_enabled: bool,
    /// Default request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Default headers for all requests.
    pub default_headers: Vec<(String, String)>,
    /// User agent string.
    pub user_agent: String,
    /// Enable gzip compression.
    pub gzip: bool,
    /// Enable brotli compression.
    pub brotli: bool,
    /// Key order used when encoding nested query mappings.
    pub nested_keys: NestedKeyOrder,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            cache_enabled: false,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            default_headers: Vec::new(),
            user_agent: format!("courier-http-client/{}", env!("CARGO_PKG_VERSION")),
            gzip: true,
            brotli: true,
            nested_keys: NestedKeyOrder::default(),
        }
    }
}

impl HttpClientConfig {
    /// Create a configuration for an API origin.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new configuration builder.
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Take the API origin and cache flag from application configuration.
    pub fn from_app_config(app: &ClientAppConfig) -> Self {
        Self::builder()
            .base_url(app.api.clone())
            .cache_enabled(app.cache.api)
            .build()
    }
}

/// Builder for API client configuration.
#[derive(Debug, Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the API origin. A trailing slash is dropped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Enable or disable API response caching.
    pub fn cache_enabled(mut self, enable: bool) -> Self {
        self.config.cache_enabled = enable;
        self
    }

    /// Set the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header for all requests.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.push((name.into(), value.into()));
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Enable or disable gzip compression.
    pub fn gzip(mut self, enable: bool) -> Self {
        self.config.gzip = enable;
        self
    }

    /// Enable or disable brotli compression.
    pub fn brotli(mut self, enable: bool) -> Self {
        self.config.brotli = enable;
        self
    }

    /// Set the key order for nested query mappings.
    pub fn nested_keys(mut self, order: NestedKeyOrder) -> Self {
        self.config.nested_keys = order;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}
