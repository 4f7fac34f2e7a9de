use async_trait::async_trait;

use crate::{
    domain::models::{attachment::RawFile, signature::SignedUploadDescriptor},
    services::StorageError,
};

/// Direct upload target for signed form POSTs.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Sends `file` to `descriptor.url` using the descriptor's signing fields.
    async fn post_signed(
        &self,
        descriptor: &SignedUploadDescriptor,
        file: &RawFile,
    ) -> Result<(), StorageError>;
}
