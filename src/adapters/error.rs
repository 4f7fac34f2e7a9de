use tracing::{error, warn};

use crate::{application::error::ApiError, domain::models::envelope::ErrorEnvelope};

impl ApiError {
    /// Normalized failure shape handed back to callers.
    pub fn envelope(&self) -> ErrorEnvelope {
        let status_code = self.status_code();
        let message = match self {
            ApiError::Backend {
                status, message, ..
            } => {
                if *status >= 500 {
                    error!("Backend server error ({}): {}", status, message);
                } else {
                    warn!("Backend rejected request ({}): {}", status, message);
                }
                message.clone()
            }
            ApiError::Transport { .. } => {
                error!("{}", self);
                self.to_string()
            }
            ApiError::Configuration(msg) => {
                warn!("Request not sent: {}", msg);
                self.to_string()
            }
            ApiError::Decode { .. } => {
                error!("{}", self);
                self.to_string()
            }
            ApiError::Signing(inner) => {
                warn!("Upload signing failed: {}", inner);
                self.to_string()
            }
            ApiError::StorageUpload { .. } => {
                if status_code.is_some() {
                    warn!("{}", self);
                } else {
                    error!("{}", self);
                }
                self.to_string()
            }
            ApiError::InvalidAttachment { .. } => {
                warn!("{}", self);
                self.to_string()
            }
        };

        ErrorEnvelope {
            success: false,
            message,
            status_code,
            kind: self.kind(),
            data: self.body(),
        }
    }
}

impl From<ApiError> for ErrorEnvelope {
    fn from(error: ApiError) -> Self {
        error.envelope()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::error::TransportKind, domain::models::envelope::FailureKind,
        services::StorageError,
    };
    use serde_json::json;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logged_while(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn unauthorized_backend_error_keeps_status() {
        let envelope = ErrorEnvelope::from(ApiError::Backend {
            status: 401,
            message: "Unauthorized".to_string(),
            body: json!({"message": "Unauthorized"}),
        });
        assert!(!envelope.success);
        assert_eq!(envelope.status_code, Some(401));
        assert_eq!(envelope.kind, FailureKind::Backend);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap()["statusCode"],
            json!(401)
        );
    }

    #[test]
    fn server_side_backend_error_is_logged_once_as_error() {
        let logs = logged_while(|| {
            let envelope = ApiError::Backend {
                status: 503,
                message: "maintenance".to_string(),
                body: json!({"message": "maintenance"}),
            }
            .envelope();
            assert_eq!(envelope.status_code, Some(503));
        });
        assert_eq!(logs.lines().count(), 1, "{logs}");
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("maintenance"));
    }

    #[test]
    fn rejected_request_is_logged_once_as_warning() {
        let logs = logged_while(|| {
            ApiError::Backend {
                status: 422,
                message: "name is required".to_string(),
                body: json!(null),
            }
            .envelope();
        });
        assert_eq!(logs.lines().count(), 1, "{logs}");
        assert!(logs.contains("WARN"));
    }

    #[test]
    fn transport_error_has_no_status() {
        let envelope = ApiError::Transport {
            kind: TransportKind::Timeout,
            message: "Request timeout".to_string(),
        }
        .envelope();
        assert_eq!(envelope.status_code, None);
        assert_eq!(envelope.data, json!(null));
    }

    #[test]
    fn storage_failure_reports_index() {
        let envelope = ApiError::StorageUpload {
            index: 2,
            source: StorageError::from_status(403, "policy expired".to_string()),
        }
        .envelope();
        assert_eq!(envelope.kind, FailureKind::StorageUpload);
        assert_eq!(envelope.status_code, Some(403));
        assert!(envelope.message.contains("#2"));
    }
}
