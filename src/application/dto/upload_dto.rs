use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Storage category; the backend picks path and policy from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResource {
    Brand,
    BrandProduct,
    Other(String),
}

impl UploadResource {
    pub fn as_str(&self) -> &str {
        match self {
            UploadResource::Brand => "brand",
            UploadResource::BrandProduct => "brand_product",
            UploadResource::Other(name) => name,
        }
    }
}

impl fmt::Display for UploadResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UploadResource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "brand" => UploadResource::Brand,
            "brand_product" => UploadResource::BrandProduct,
            other => UploadResource::Other(other.to_string()),
        })
    }
}

impl Serialize for UploadResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UploadResource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(UploadResource::Other(raw)))
    }
}

/// One entry of a signing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureRequest {
    pub content_type: String,
    pub resource: UploadResource,
}
