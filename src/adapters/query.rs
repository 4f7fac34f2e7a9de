use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

/// RFC 3986 unreserved characters stay as they are.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Arrays repeat the key and nested objects use bracket keys. `null` renders
/// as an empty value, empty arrays and objects are dropped.
pub fn to_query_string(params: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        push_pairs(&mut pairs, key.clone(), value);
    }
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", encode(&key), encode(&value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn push_pairs(pairs: &mut Vec<(String, String)>, key: String, value: &Value) {
    match value {
        Value::Null => pairs.push((key, String::new())),
        Value::Bool(b) => pairs.push((key, b.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for item in items {
                push_pairs(pairs, key.clone(), item);
            }
        }
        Value::Object(fields) => {
            for (child, item) in fields {
                push_pairs(pairs, format!("{}[{}]", key, child), item);
            }
        }
    }
}

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(value: Value) -> String {
        match value {
            Value::Object(map) => to_query_string(&map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn keeps_field_order_and_empty_strings() {
        assert_eq!(
            query(json!({"page": 2, "limit": 10, "keyword": ""})),
            "page=2&limit=10&keyword="
        );
    }

    #[test]
    fn arrays_repeat_the_key() {
        let qs = query(json!({"tags": ["a", "b"]}));
        assert_eq!(qs, "tags=a&tags=b");
        assert!(!qs.contains("%5B%5D"));
    }

    #[test]
    fn nested_objects_use_brackets() {
        assert_eq!(
            query(json!({"filter": {"status": "active"}, "ids": [], "empty": {}})),
            "filter%5Bstatus%5D=active"
        );
    }

    #[test]
    fn values_are_component_encoded() {
        assert_eq!(
            query(json!({"keyword": "a b&c(1)", "flag": true, "none": null})),
            "keyword=a%20b%26c%281%29&flag=true&none="
        );
    }
}
