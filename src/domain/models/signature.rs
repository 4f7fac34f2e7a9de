use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Short-lived credential set for one direct POST to object storage.
///
/// Issued per upload and consumed by exactly one request; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedUploadDescriptor {
    pub url: String,
    pub key: String,
    pub policy: String,
    #[serde(rename = "x-amz-credential")]
    pub amz_credential: String,
    #[serde(rename = "x-amz-algorithm", default, skip_serializing_if = "Option::is_none")]
    pub amz_algorithm: Option<String>,
    #[serde(rename = "x-amz-signature")]
    pub amz_signature: String,
    #[serde(rename = "x-amz-date")]
    pub amz_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,
    #[serde(rename = "content-type")]
    pub content_type: String,
    /// Any further signing fields the backend adds; forwarded as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SignedUploadDescriptor {
    /// Form fields for the storage POST, `key` last. The file part goes after these.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("policy".to_string(), self.policy.clone()),
            ("x-amz-credential".to_string(), self.amz_credential.clone()),
        ];
        if let Some(algorithm) = &self.amz_algorithm {
            fields.push(("x-amz-algorithm".to_string(), algorithm.clone()));
        }
        fields.push(("x-amz-signature".to_string(), self.amz_signature.clone()));
        fields.push(("x-amz-date".to_string(), self.amz_date.clone()));
        if let Some(acl) = &self.acl {
            fields.push(("acl".to_string(), acl.clone()));
        }
        fields.push(("content-type".to_string(), self.content_type.clone()));
        for (name, value) in &self.extra {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            fields.push((name.clone(), value));
        }
        fields.push(("key".to_string(), self.key.clone()));
        fields
    }
}
