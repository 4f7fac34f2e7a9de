use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized shape of every successful call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(status_code: u16, message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code,
            data,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            message: self.message,
            status_code: self.status_code,
            data: f(self.data),
        }
    }
}

/// Which side of the wire a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Configuration,
    Transport,
    Backend,
    Decode,
    Signing,
    StorageUpload,
    InvalidAttachment,
}

/// Normalized shape of every failed call.
///
/// `status_code` is `None` when the request never reached the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: Option<u16>,
    pub kind: FailureKind,
    pub data: Value,
}
