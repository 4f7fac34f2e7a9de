use serde::{Deserialize, Serialize};

use super::{attachment::Attachment, nullable::null_as_default};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brand {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shopify_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub shopify_domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
    #[serde(deserialize_with = "null_as_default")]
    pub access_token: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_primary_location_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub has_fetched_products: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub primary_color: String,
    pub get_started_image_attachment: Option<Attachment>,
    pub logo_image_attachment: Option<Attachment>,
    pub background_image_attachment: Option<Attachment>,
    pub frame_image_attachment: Option<Attachment>,
}
