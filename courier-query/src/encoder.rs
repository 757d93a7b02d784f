//! Recursive bracket-notation encoder.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::QueryValue;

/// Bytes left untouched by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// How keys of mappings below the top level are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedKeyOrder {
    /// Last key first, stopping before the first key (which is never emitted).
    #[default]
    LegacyReverse,
    /// Every key, in insertion order.
    Forward,
}

/// Query string encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEncoder {
    nested_keys: NestedKeyOrder,
}

impl QueryEncoder {
    /// Create an encoder with the default (legacy) nested key order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the nested key order.
    pub fn with_nested_keys(mut self, order: NestedKeyOrder) -> Self {
        self.nested_keys = order;
        self
    }

    /// Get the nested key order.
    pub fn nested_keys(&self) -> NestedKeyOrder {
        self.nested_keys
    }

    /// Encode a value as a query string (without the leading `?`).
    pub fn encode(&self, value: &QueryValue) -> String {
        self.pairs(value).join("&").replace("%20", "+")
    }

    /// Flatten a value into encoded `key=value` pairs, in output order.
    pub fn pairs(&self, value: &QueryValue) -> Vec<String> {
        let mut out = Vec::new();
        self.build("", value, &mut out);
        out
    }

    fn build(&self, prefix: &str, value: &QueryValue, out: &mut Vec<String>) {
        if prefix.is_empty() {
            match value {
                QueryValue::Mapping(entries) => {
                    for (key, child) in entries {
                        self.build(key, child, out);
                    }
                }
                QueryValue::Sequence(items) => {
                    for (index, item) in items.iter().enumerate() {
                        self.build(&index.to_string(), item, out);
                    }
                }
                // A bare scalar has no key to hang off.
                _ => {}
            }
            return;
        }

        match value {
            QueryValue::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    if prefix.ends_with("[]") {
                        push_pair(out, prefix, &item.leaf_text());
                    } else if item.takes_index() {
                        self.build(&format!("{prefix}[{index}]"), item, out);
                    } else {
                        self.build(&format!("{prefix}[]"), item, out);
                    }
                }
            }
            QueryValue::Mapping(entries) => match self.nested_keys {
                NestedKeyOrder::Forward => {
                    for (key, child) in entries {
                        self.build(&format!("{prefix}[{key}]"), child, out);
                    }
                }
                NestedKeyOrder::LegacyReverse => {
                    for (key, child) in entries.iter().skip(1).rev() {
                        self.build(&format!("{prefix}[{key}]"), child, out);
                    }
                }
            },
            scalar => push_pair(out, prefix, &scalar.leaf_text()),
        }
    }
}

fn push_pair(out: &mut Vec<String>, key: &str, value: &str) {
    out.push(format!(
        "{}={}",
        utf8_percent_encode(key, URI_COMPONENT),
        utf8_percent_encode(value, URI_COMPONENT)
    ));
}

/// Encode with the default encoder.
pub fn encode(value: &QueryValue) -> String {
    QueryEncoder::default().encode(value)
}
