use async_trait::async_trait;
use reqwest::{multipart, Client};
use tracing::debug;

use crate::{
    application::services::ObjectStorage,
    domain::models::{attachment::RawFile, signature::SignedUploadDescriptor},
    services::error::StorageError,
};

/// Sends files to an S3-compatible bucket with a signed form POST.
#[derive(Clone, Default)]
pub struct S3PostStorage {
    client: Client,
}

impl S3PostStorage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStorage for S3PostStorage {
    async fn post_signed(
        &self,
        descriptor: &SignedUploadDescriptor,
        file: &RawFile,
    ) -> Result<(), StorageError> {
        let mut form = multipart::Form::new();
        for (name, value) in descriptor.form_fields() {
            form = form.text(name, value);
        }

        let file_part = multipart::Part::bytes(file.content.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type())
            .map_err(|e| StorageError::InternalError(e.to_string()))?;
        let form = form.part("file", file_part);

        let response = self
            .client
            .post(&descriptor.url)
            .header("X-Amz-Credential", &descriptor.amz_credential)
            .multipart(form)
            .send()
            .await
            .map_err(StorageError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::from_status(
                status.as_u16(),
                format!("Upload failed: {}", error_text),
            ));
        }

        debug!("Stored {} at {}", file.file_name, descriptor.key);
        Ok(())
    }
}
