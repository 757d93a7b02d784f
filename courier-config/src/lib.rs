// Client application configuration for Courier

pub mod env;
pub mod error;
pub mod loader;
pub mod validation;

pub use env::{DEFAULT_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use validation::{ConfigValidator, Validate};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Settings the API client reads once, at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAppConfig {
    /// API origin every request path is appended to.
    pub api: String,
    /// Cache switches.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Cache switches. Captured for callers; the client never caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub api: bool,
}

impl ClientAppConfig {
    /// Create a configuration for the given API origin with caching disabled
    pub fn new(api: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            cache: CacheConfig::default(),
        }
    }

    /// Set the API cache flag
    pub fn with_api_cache(mut self, enabled: bool) -> Self {
        self.cache.api = enabled;
        self
    }

    /// Start assembling configuration from files and the environment
    pub fn sources() -> ConfigSources {
        ConfigSources::new()
    }

    /// Deserialize and validate a merged configuration tree
    pub fn from_value(value: Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for ClientAppConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.api, "api")?;
        ConfigValidator::is_url(&self.api, "api")
    }
}

enum Layer {
    File(PathBuf),
    Dotenv(Option<PathBuf>),
    Env,
    Value(Value),
}

/// Layered configuration builder
///
/// Layers are applied in the order they are added; later layers override
/// earlier ones key by key.
pub struct ConfigSources {
    prefix: String,
    layers: Vec<Layer>,
}

impl ConfigSources {
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            layers: Vec::new(),
        }
    }

    /// Set the environment variable prefix (default `COURIER`)
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Add a JSON, TOML or env-format file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.layers.push(Layer::File(path.into()));
        self
    }

    /// Add prefixed variables from a .env file (`None` looks for `./.env`
    /// and skips silently when it is missing)
    pub fn dotenv(mut self, path: Option<PathBuf>) -> Self {
        self.layers.push(Layer::Dotenv(path));
        self
    }

    /// Add prefixed variables from the process environment
    pub fn env(mut self) -> Self {
        self.layers.push(Layer::Env);
        self
    }

    /// Add a single value at a dotted key (`"cache.api"`)
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        let mut root = Value::Object(Map::new());
        let path: Vec<String> = key.split('.').map(str::to_string).collect();
        env::insert_path(&mut root, &path, value.into());
        self.layers.push(Layer::Value(root));
        self
    }

    /// Merge all layers into one tree without validating it
    pub fn merged(&self) -> Result<Value> {
        let loader = EnvLoader::new(self.prefix.clone());
        let mut merged = Value::Object(Map::new());

        for layer in &self.layers {
            let value = match layer {
                Layer::File(path) => ConfigLoader::auto(path)?.load_file(path)?,
                Layer::Dotenv(Some(path)) => {
                    let vars = dotenvy::from_path_iter(path)
                        .map_err(|e| ConfigError::LoadError(e.to_string()))?
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(|e| ConfigError::ParseError(e.to_string()))?;
                    loader.load_from(vars)
                }
                Layer::Dotenv(None) => match dotenvy::dotenv_iter() {
                    Ok(iter) => loader.load_from(iter.filter_map(|v| v.ok())),
                    Err(e) => {
                        tracing::debug!(error = %e, "No .env file found, skipping");
                        continue;
                    }
                },
                Layer::Env => loader.load(),
                Layer::Value(value) => value.clone(),
            };
            merge(&mut merged, value);
        }

        Ok(merged)
    }

    /// Merge, deserialize and validate
    pub fn build(self) -> Result<ClientAppConfig> {
        ClientAppConfig::from_value(self.merged()?)
    }
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep-merge `overlay` into `base`; objects merge per key, anything else replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
