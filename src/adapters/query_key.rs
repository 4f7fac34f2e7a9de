use serde::Serialize;
use serde_json::Value;

use crate::application::error::ApiError;

/// Cache key `[operation, ...params]` handed to an external query cache.
///
/// Equality is structural; two keys built from equal inputs compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<Value>);

impl QueryKey {
    pub fn new(operation: &str) -> Self {
        Self(vec![Value::String(operation.to_string())])
    }

    pub fn from_parts(parts: Vec<Value>) -> Self {
        Self(parts)
    }

    /// Appends one serialized parameter.
    pub fn with<P: Serialize + ?Sized>(mut self, param: &P) -> Result<Self, ApiError> {
        let value = serde_json::to_value(param).map_err(|e| {
            ApiError::configuration(format!("query key parameter is not serializable: {}", e))
        })?;
        self.0.push(value);
        Ok(self)
    }

    pub fn push_value(mut self, value: Value) -> Self {
        self.0.push(value);
        self
    }

    pub fn parts(&self) -> &[Value] {
        &self.0
    }

    /// The operation name this key was built for.
    pub fn operation(&self) -> Option<&str> {
        self.0.first().and_then(Value::as_str)
    }

    /// Whether `self` invalidates `other`: true when `self` is a leading slice of it.
    pub fn is_prefix_of(&self, other: &QueryKey) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl From<QueryKey> for Value {
    fn from(key: QueryKey) -> Self {
        Value::Array(key.0)
    }
}

/// Resource keys shared by list and detail screens.
pub mod query_keys {
    use serde_json::Value;

    use super::QueryKey;

    fn keyed(resource: &str, id: &str) -> QueryKey {
        QueryKey::new(resource).push_value(Value::String(id.to_string()))
    }

    pub fn login() -> QueryKey {
        QueryKey::new("login")
    }

    pub fn logout() -> QueryKey {
        QueryKey::new("logout")
    }

    pub fn me() -> QueryKey {
        QueryKey::new("me")
    }

    pub fn dashboard() -> QueryKey {
        QueryKey::new("dashboard")
    }

    pub fn brands() -> QueryKey {
        QueryKey::new("brands")
    }

    pub fn brand(id: &str) -> QueryKey {
        keyed("brands", id)
    }

    pub fn products() -> QueryKey {
        QueryKey::new("products")
    }

    pub fn product(id: &str) -> QueryKey {
        keyed("products", id)
    }

    pub fn device_sessions() -> QueryKey {
        QueryKey::new("deviceSessions")
    }

    pub fn device_session(id: &str) -> QueryKey {
        keyed("deviceSessions", id)
    }

    pub fn brand_device_sessions() -> QueryKey {
        QueryKey::new("brandDeviceSessions")
    }

    pub fn brand_device_session(id: &str) -> QueryKey {
        keyed("brandDeviceSessions", id)
    }

    pub fn social_accounts() -> QueryKey {
        QueryKey::new("social-accounts")
    }
}
