use serde::{Deserialize, Serialize};

use super::{brand::Brand, nullable::null_as_default, product::Product};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(deserialize_with = "null_as_default")]
    pub total_users: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub active_brands: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_products: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub revenue: String,
    #[serde(deserialize_with = "null_as_default")]
    pub recent_brands: Vec<Brand>,
    #[serde(deserialize_with = "null_as_default")]
    pub recent_products: Vec<Product>,
}
