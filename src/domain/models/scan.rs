use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{device_session::BrandDeviceSession, nullable::null_as_default, product::Product};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scan {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub job_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub detail: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub product_id: String,
    pub product: Option<Product>,
    #[serde(deserialize_with = "null_as_default")]
    pub brand_device_session_id: String,
    pub brand_device_session: Option<BrandDeviceSession>,
}
