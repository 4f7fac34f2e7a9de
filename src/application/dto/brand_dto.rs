use serde::{Deserialize, Serialize};

use crate::domain::models::attachment::Attachment;

/// Identifies one brand in a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandRef {
    pub brand_id: String,
}

impl BrandRef {
    pub fn new(brand_id: impl Into<String>) -> Self {
        Self {
            brand_id: brand_id.into(),
        }
    }
}

/// Writable brand fields. Unset fields are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_shop_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get_started_image_attachment: Option<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_image_attachment: Option<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image_attachment: Option<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_image_attachment: Option<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBrandInput {
    pub brand_id: String,
    #[serde(flatten)]
    pub form: BrandForm,
}
