use std::fmt;

use serde_json::Value;

use crate::{domain::models::envelope::FailureKind, services::StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Other,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Timeout => f.write_str("timeout"),
            TransportKind::Connect => f.write_str("connect"),
            TransportKind::Other => f.write_str("other"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error ({kind}): {message}")]
    Transport { kind: TransportKind, message: String },

    #[error("Backend responded with {status}: {message}")]
    Backend {
        status: u16,
        message: String,
        body: Value,
    },

    #[error("Unexpected response body (status {status}): {message}")]
    Decode { status: u16, message: String },

    #[error("Upload signing failed: {0}")]
    Signing(#[source] Box<ApiError>),

    #[error("Upload of file #{index} to storage failed: {source}")]
    StorageUpload {
        index: usize,
        #[source]
        source: StorageError,
    },

    #[error("Attachment #{index} cannot be uploaded: {reason}")]
    InvalidAttachment { index: usize, reason: String },
}

impl ApiError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ApiError::Configuration(message.into())
    }

    /// HTTP status of the failing response; `None` if no response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } | ApiError::Decode { status, .. } => Some(*status),
            ApiError::Signing(inner) => inner.status_code(),
            ApiError::StorageUpload { source, .. } => source.status_code(),
            ApiError::Configuration(_)
            | ApiError::Transport { .. }
            | ApiError::InvalidAttachment { .. } => None,
        }
    }

    /// True when the request never reached a server.
    pub fn is_transport(&self) -> bool {
        match self {
            ApiError::Transport { .. } => true,
            ApiError::Signing(inner) => inner.is_transport(),
            ApiError::StorageUpload { source, .. } => source.is_network(),
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ApiError::Configuration(_) => FailureKind::Configuration,
            ApiError::Transport { .. } => FailureKind::Transport,
            ApiError::Backend { .. } => FailureKind::Backend,
            ApiError::Decode { .. } => FailureKind::Decode,
            ApiError::Signing(_) => FailureKind::Signing,
            ApiError::StorageUpload { .. } => FailureKind::StorageUpload,
            ApiError::InvalidAttachment { .. } => FailureKind::InvalidAttachment,
        }
    }

    /// The backend's error payload, when there is one.
    pub fn body(&self) -> Value {
        match self {
            ApiError::Backend { body, .. } => body.clone(),
            ApiError::Signing(inner) => inner.body(),
            _ => Value::Null,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ApiError::Transport {
                kind: TransportKind::Timeout,
                message: "Request timeout".to_string(),
            }
        } else if error.is_connect() {
            ApiError::Transport {
                kind: TransportKind::Connect,
                message: format!("Connection failed: {}", error),
            }
        } else if error.is_builder() {
            ApiError::Configuration(error.to_string())
        } else {
            ApiError::Transport {
                kind: TransportKind::Other,
                message: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn backend_errors_keep_status_and_body() {
        let err = ApiError::Backend {
            status: 401,
            message: "Unauthorized".to_string(),
            body: json!({"message": "token expired"}),
        };
        assert_eq!(err.status_code(), Some(401));
        assert!(err.is_unauthorized());
        assert!(!err.is_transport());
        assert_eq!(err.body()["message"], "token expired");
    }

    #[test]
    fn transport_errors_have_no_status() {
        let err = ApiError::Transport {
            kind: TransportKind::Connect,
            message: "refused".to_string(),
        };
        assert_eq!(err.status_code(), None);
        assert!(err.is_transport());
        assert_eq!(err.kind(), FailureKind::Transport);
    }

    #[test]
    fn signing_wraps_inner_status() {
        let err = ApiError::Signing(Box::new(ApiError::Backend {
            status: 422,
            message: "content type not allowed".to_string(),
            body: Value::Null,
        }));
        assert_eq!(err.status_code(), Some(422));
        assert_eq!(err.kind(), FailureKind::Signing);
    }
}
