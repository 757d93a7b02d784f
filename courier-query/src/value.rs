//! Tagged input values for the query encoder.

use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

use crate::Result;

/// A scalar computed when the query string is built rather than when the
/// value tree is assembled. `None` encodes as the literal text `null`; only a
/// plain [`QueryValue::Null`] encodes as an empty value.
#[derive(Clone)]
pub struct Deferred(Arc<dyn Fn() -> Option<String> + Send + Sync>);

impl Deferred {
    /// Wrap a callable.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the callable.
    pub fn evaluate(&self) -> Option<String> {
        (self.0)()
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// A value that can be flattened into query parameters.
#[derive(Debug, Clone)]
pub enum QueryValue {
    /// Encodes as an empty value.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// A JSON number.
    Number(Number),
    /// A string, percent-encoded on output.
    String(String),
    /// A callable evaluated at encode time.
    Deferred(Deferred),
    /// An ordered list, written with `[]` or `[index]` suffixes.
    Sequence(Vec<QueryValue>),
    /// Ordered key/value pairs, written with `[key]` suffixes.
    Mapping(Vec<(String, QueryValue)>),
}

impl QueryValue {
    /// Build a mapping from key/value pairs, keeping their order.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence from any iterator of convertible items.
    pub fn seq<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Build a deferred scalar.
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        Self::Deferred(Deferred::new(f))
    }

    /// Convert any serializable value, keeping struct field and map order.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::from(serde_json::to_value(value)?))
    }

    /// Check if this is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Check if this is a sequence.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Array elements that are containers (or null) get an explicit index.
    pub(crate) fn takes_index(&self) -> bool {
        matches!(self, Self::Mapping(_) | Self::Sequence(_) | Self::Null)
    }

    /// Text written on the value side of a pair.
    pub(crate) fn leaf_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => number_text(n),
            Self::String(s) => s.clone(),
            Self::Deferred(d) => d.evaluate().unwrap_or_else(|| "null".to_string()),
            Self::Sequence(items) => items
                .iter()
                .map(Self::leaf_text)
                .collect::<Vec<_>>()
                .join(","),
            Self::Mapping(_) => "[object Object]".to_string(),
        }
    }
}

/// Integral floats print without a fraction, the way browsers stringify them.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        match Number::from_f64(value) {
            Some(n) => Self::Number(n),
            None if value.is_nan() => Self::String("NaN".to_string()),
            None if value > 0.0 => Self::String("Infinity".to_string()),
            None => Self::String("-Infinity".to_string()),
        }
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        Self::seq(items)
    }
}

impl From<Deferred> for QueryValue {
    fn from(value: Deferred) -> Self {
        Self::Deferred(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Filter {
        zeta: u32,
        alpha: &'static str,
        tags: Vec<&'static str>,
    }

    #[test]
    fn test_from_serialize_keeps_field_order() {
        let value = QueryValue::from_serialize(&Filter {
            zeta: 1,
            alpha: "a",
            tags: vec!["x"],
        })
        .unwrap();

        let QueryValue::Mapping(entries) = value else {
            panic!("expected mapping");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "tags"]);
        assert!(entries[2].1.is_sequence());
    }

    #[test]
    fn test_from_json_object_keeps_insertion_order() {
        let value = QueryValue::from(json!({"b": 1, "a": {"d": 2, "c": 3}}));
        let QueryValue::Mapping(entries) = value else {
            panic!("expected mapping");
        };
        assert_eq!(entries[0].0, "b");
        assert!(entries[1].1.is_mapping());
    }

    #[test]
    fn test_leaf_text() {
        assert_eq!(QueryValue::Null.leaf_text(), "");
        assert_eq!(QueryValue::from(false).leaf_text(), "false");
        assert_eq!(QueryValue::from(2.0).leaf_text(), "2");
        assert_eq!(QueryValue::from(-0.0).leaf_text(), "0");
        assert_eq!(QueryValue::from(2.5).leaf_text(), "2.5");
        assert_eq!(QueryValue::from(f64::NAN).leaf_text(), "NaN");
        assert_eq!(QueryValue::from(-7i64).leaf_text(), "-7");
        assert_eq!(QueryValue::from(vec![1, 2, 3]).leaf_text(), "1,2,3");
        assert_eq!(
            QueryValue::map([("k", QueryValue::from(1))]).leaf_text(),
            "[object Object]"
        );
    }

    #[test]
    fn test_deferred_is_evaluated_on_each_read() {
        let value = QueryValue::deferred(|| Some("now".to_string()));
        assert_eq!(value.leaf_text(), "now");

        let missing = QueryValue::deferred(|| None);
        assert_eq!(missing.leaf_text(), "null");
    }

    #[test]
    fn test_option_conversion() {
        assert!(matches!(QueryValue::from(None::<i32>), QueryValue::Null));
        assert!(matches!(QueryValue::from(Some("x")), QueryValue::String(_)));
    }
}
