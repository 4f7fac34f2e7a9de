use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::nullable::null_as_default;

/// Timestamps on sessions are unix seconds.
fn from_unix(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSession {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub device_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user_agent: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
}

impl DeviceSession {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        from_unix(self.created_at)
    }

    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> {
        from_unix(self.updated_at)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandDeviceSession {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub brand_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub device_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_address: String,
    #[serde(deserialize_with = "null_as_default")]
    pub device_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub app_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub app_platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub app_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub app_env: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
}

impl BrandDeviceSession {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        from_unix(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_timestamps_convert() {
        let session = DeviceSession {
            created_at: 1_700_000_000,
            ..Default::default()
        };
        let created = session.created_at_utc().unwrap();
        assert_eq!(created.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
