use serde::{Deserialize, Serialize};

use super::nullable::null_as_default;

/// A connected social-media account (instagram, tiktok).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialAccount {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub account_name: String,
}
