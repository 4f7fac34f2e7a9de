use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Authentication failed ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Storage provider error ({status}): {message}")]
    ProviderError { status: u16, message: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl StorageError {
    /// Builds the error for a non-success response from the storage endpoint.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => StorageError::Unauthorized { status, message },
            _ => StorageError::ProviderError { status, message },
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            StorageError::Unauthorized { status, .. } | StorageError::ProviderError { status, .. } => {
                Some(*status)
            }
            StorageError::NetworkError(_) | StorageError::InternalError(_) => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, StorageError::NetworkError(_))
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StorageError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            StorageError::NetworkError(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            StorageError::from_status(status.as_u16(), error.to_string())
        } else if error.is_request() || error.is_body() {
            StorageError::NetworkError(error.to_string())
        } else {
            StorageError::InternalError(error.to_string())
        }
    }
}
