//! Decode encoded query strings back into a value tree and compare shapes.

use courier_query::{NestedKeyOrder, QueryEncoder, QueryValue};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value, json};

/// Minimal bracket-notation decoder: `a[b][]=1` becomes `{"a": {"b": ["1"]}}`.
fn decode(query: &str) -> Value {
    let mut root = Value::Object(Map::new());
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = unescape(key);
        let value = Value::String(unescape(value));

        let (head, rest) = key.split_once('[').unwrap_or((key.as_str(), ""));
        let mut segments = vec![head.to_string()];
        segments.extend(
            rest.strip_suffix(']')
                .unwrap_or(rest)
                .split("][")
                .filter(|_| !rest.is_empty())
                .map(str::to_string),
        );
        insert(&mut root, &segments, value);
    }
    root
}

fn unescape(s: &str) -> String {
    percent_decode_str(&s.replace('+', " "))
        .decode_utf8()
        .unwrap()
        .into_owned()
}

fn insert(node: &mut Value, segments: &[String], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if segment.is_empty() || segment.parse::<usize>().is_ok() {
        if !node.is_array() {
            *node = Value::Array(Vec::new());
        }
        let items = node.as_array_mut().unwrap();
        let index = match segment.parse::<usize>() {
            Ok(i) => i,
            Err(_) => items.len(),
        };
        while items.len() <= index {
            items.push(Value::Null);
        }
        insert(&mut items[index], rest, value);
    } else {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let child = node
            .as_object_mut()
            .unwrap()
            .entry(segment.clone())
            .or_insert(Value::Null);
        insert(child, rest, value);
    }
}

#[test]
fn test_forward_order_reconstructs_structure() {
    let input = json!({
        "user": {"name": "Ada Lovelace", "roles": ["admin", "dev"]},
        "page": 2,
        "items": [{"id": 1, "tags": ["a"]}, {"id": 2, "tags": ["b", "c"]}],
    });

    let encoder = QueryEncoder::new().with_nested_keys(NestedKeyOrder::Forward);
    let decoded = decode(&encoder.encode(&QueryValue::from(input)));

    assert_eq!(
        decoded,
        json!({
            "user": {"name": "Ada Lovelace", "roles": ["admin", "dev"]},
            "page": "2",
            "items": [{"id": "1", "tags": ["a"]}, {"id": "2", "tags": ["b", "c"]}],
        })
    );
}

#[test]
fn test_legacy_order_loses_first_nested_key_only() {
    let input = json!({
        "filter": {"status": "open", "owner": "me", "label": "bug"},
        "limit": 5,
    });

    let decoded = decode(&QueryEncoder::new().encode(&QueryValue::from(input)));

    assert_eq!(
        decoded,
        json!({
            "filter": {"label": "bug", "owner": "me"},
            "limit": "5",
        })
    );
}

#[test]
fn test_null_leaves_decode_as_empty_strings() {
    let input = json!({"a": null, "b": {"x": 1, "y": null}});

    let encoder = QueryEncoder::new().with_nested_keys(NestedKeyOrder::Forward);
    let decoded = decode(&encoder.encode(&QueryValue::from(input)));

    assert_eq!(decoded, json!({"a": "", "b": {"x": "1", "y": ""}}));
}
