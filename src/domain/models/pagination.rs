use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::nullable::null_as_default;

/// `{ records: [...] }` wrapper used by batch endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Records<T> {
    pub records: Vec<T>,
}

impl<T> Records<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_record: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_page: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_prev: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_page: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_current_record: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_counters_default_to_zero() {
        let page: Paginated<Value> = serde_json::from_value(json!({
            "records": [{"id": "b1"}],
            "has_next": true,
            "current_page": 1
        }))
        .unwrap();

        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total_record, 0);
        assert!(page.has_next);
        assert!(page.per_page.is_none());
    }

    #[test]
    fn null_counters_default_to_zero() {
        let page: Paginated<Value> = serde_json::from_value(json!({
            "records": [],
            "total_record": null,
            "has_prev": null
        }))
        .unwrap();
        assert_eq!(page.total_record, 0);
        assert!(!page.has_prev);
    }
}
