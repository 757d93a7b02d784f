// Environment variable loading

use serde_json::{Map, Value};
use std::env;

/// Default prefix for client variables (`COURIER_API`, `COURIER_CACHE_API`).
pub const DEFAULT_PREFIX: &str = "COURIER";

/// Environment variable loader
///
/// Variables are matched by prefix, lowercased and nested on underscores:
/// `COURIER_CACHE_API=true` becomes `{"cache": {"api": true}}`. A double
/// underscore (`COURIER_SOME_KEY__INNER`) splits only on `__`, which keeps
/// single underscores inside key names.
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Get the prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Load matching variables from the process environment
    pub fn load(&self) -> Value {
        self.load_from(env::vars())
    }

    /// Load matching variables from an explicit set of pairs
    pub fn load_from<I>(&self, vars: I) -> Value
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut root = Value::Object(Map::new());
        let marker = format!("{}_", self.prefix);

        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(&marker) {
                let path = key_path(stripped);
                if !path.is_empty() {
                    insert_path(&mut root, &path, scalar(&value));
                }
            }
        }

        root
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Split a variable name into lowercase path segments.
pub(crate) fn key_path(key: &str) -> Vec<String> {
    let separator = if key.contains("__") { "__" } else { "_" };
    key.split(separator)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Interpret a raw string the way a typed config file would.
pub(crate) fn scalar(raw: &str) -> Value {
    match raw.trim() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}

pub(crate) fn insert_path(root: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let current = node;
        node = match current {
            Value::Object(map) => map
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => return,
        };
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert(last.clone(), value);
    }
}
