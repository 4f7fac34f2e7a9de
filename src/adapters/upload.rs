use std::sync::Arc;

use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{
    endpoints::{GetS3Signature, GetS3Signatures},
    request_client::ApiClient,
};
use crate::{
    application::{
        dto::upload_dto::{SignatureRequest, UploadResource},
        error::ApiError,
        services::ObjectStorage,
    },
    domain::{
        config::client::ClientConfig,
        models::{
            attachment::{Attachment, AttachmentFile, RawFile},
            pagination::Records,
            signature::SignedUploadDescriptor,
        },
    },
};

/// Input indices split by whether they still need an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub uploaded: Vec<usize>,
    pub needs_upload: Vec<usize>,
}

pub fn partition(files: &[AttachmentFile], key_prefix: &str) -> Partition {
    let mut result = Partition::default();
    for (index, file) in files.iter().enumerate() {
        if file.is_persisted(key_prefix) {
            result.uploaded.push(index);
        } else {
            result.needs_upload.push(index);
        }
    }
    result
}

/// The backend only signs; bytes go straight to object storage and the
/// [`Attachment`] is assembled locally.
#[derive(Clone)]
pub struct Uploader {
    client: ApiClient,
    storage: Arc<dyn ObjectStorage>,
    storage_url: Option<String>,
    key_prefix: String,
}

impl Uploader {
    pub fn new(client: ApiClient, storage: Arc<dyn ObjectStorage>, config: &ClientConfig) -> Self {
        Self {
            client,
            storage,
            storage_url: config
                .storage_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string()),
            key_prefix: config.permanent_key_prefix.clone(),
        }
    }

    pub fn partition(&self, files: &[AttachmentFile]) -> Partition {
        partition(files, &self.key_prefix)
    }

    pub async fn upload_file(
        &self,
        file: RawFile,
        resource: UploadResource,
    ) -> Result<Attachment, ApiError> {
        let request = SignatureRequest {
            content_type: file.mime_type(),
            resource,
        };
        let descriptor = self
            .client
            .call::<GetS3Signature>(&request)
            .await
            .map_err(|e| ApiError::Signing(Box::new(e)))?
            .data;

        self.post(0, &descriptor, &file).await
    }

    /// Uploads every file that is not persisted yet, keeping input order.
    ///
    /// Fails as a whole; the error names the lowest failing index.
    pub async fn upload_files(
        &self,
        files: Vec<AttachmentFile>,
        resource: UploadResource,
    ) -> Result<Vec<Attachment>, ApiError> {
        if let Some(index) = files
            .iter()
            .position(|file| self.is_unreadable(file))
        {
            return Err(unreadable(index));
        }
        self.upload_files_settled(files, resource)
            .await?
            .into_iter()
            .collect()
    }

    /// Like [`Uploader::upload_files`] but with one result per input.
    ///
    /// The outer error is reserved for the signing call, which covers the
    /// whole batch.
    pub async fn upload_files_settled(
        &self,
        files: Vec<AttachmentFile>,
        resource: UploadResource,
    ) -> Result<Vec<Result<Attachment, ApiError>>, ApiError> {
        let mut slots: Vec<Option<Result<Attachment, ApiError>>> = Vec::with_capacity(files.len());
        let mut pending: Vec<(usize, RawFile)> = Vec::new();

        for (index, file) in files.into_iter().enumerate() {
            if file.is_persisted(&self.key_prefix) {
                slots.push(Some(Ok(self.pass_through(file))));
                continue;
            }
            match file {
                AttachmentFile::Raw(raw) => {
                    pending.push((index, raw));
                    slots.push(None);
                }
                AttachmentFile::Stored(_) => slots.push(Some(Err(unreadable(index)))),
            }
        }

        if pending.is_empty() {
            return Ok(slots.into_iter().flatten().collect());
        }

        let descriptors = self.sign_batch(&pending, resource).await?;

        let uploads = pending
            .iter()
            .zip(descriptors.iter())
            .map(|((index, raw), descriptor)| async move {
                (*index, self.post(*index, descriptor, raw).await)
            });
        for (index, result) in join_all(uploads).await {
            slots[index] = Some(result);
        }

        Ok(slots.into_iter().flatten().collect())
    }

    async fn sign_batch(
        &self,
        pending: &[(usize, RawFile)],
        resource: UploadResource,
    ) -> Result<Vec<SignedUploadDescriptor>, ApiError> {
        let records: Vec<SignatureRequest> = pending
            .iter()
            .map(|(_, raw)| SignatureRequest {
                content_type: raw.mime_type(),
                resource: resource.clone(),
            })
            .collect();

        info!("Requesting {} upload signatures for {}", pending.len(), resource);

        let response = self
            .client
            .call::<GetS3Signatures>(&Records::new(records))
            .await
            .map_err(|e| ApiError::Signing(Box::new(e)))?;

        let descriptors = response.data.records;
        if descriptors.len() != pending.len() {
            warn!(
                "Signing returned {} descriptors for {} files",
                descriptors.len(),
                pending.len()
            );
            return Err(ApiError::Signing(Box::new(ApiError::Decode {
                status: response.status_code,
                message: format!(
                    "expected {} descriptors, got {}",
                    pending.len(),
                    descriptors.len()
                ),
            })));
        }
        Ok(descriptors)
    }

    async fn post(
        &self,
        index: usize,
        descriptor: &SignedUploadDescriptor,
        file: &RawFile,
    ) -> Result<Attachment, ApiError> {
        debug!("Uploading {} ({} bytes) as {}", file.file_name, file.size(), descriptor.key);
        self.storage
            .post_signed(descriptor, file)
            .await
            .map_err(|source| {
                warn!("Upload of {} failed: {}", file.file_name, source);
                ApiError::StorageUpload { index, source }
            })?;
        Ok(self.build_attachment(descriptor, file))
    }

    fn build_attachment(&self, descriptor: &SignedUploadDescriptor, file: &RawFile) -> Attachment {
        let mut metadata = Map::new();
        metadata.insert("name".to_string(), Value::String(file.file_name.clone()));
        metadata.insert("size".to_string(), Value::from(file.size()));
        metadata.insert("uid".to_string(), Value::String(file.uid.clone()));

        let mut attachment = Attachment {
            content_type: Some(descriptor.content_type.clone()),
            file_key: Some(descriptor.key.clone()),
            file_name: Some(file.file_name.clone()),
            file_url: None,
            thumbnail_url: None,
            metadata: Some(metadata),
        };
        attachment.file_url = self.url_of(&attachment);
        attachment
    }

    fn pass_through(&self, file: AttachmentFile) -> Attachment {
        match file {
            AttachmentFile::Stored(attachment) => attachment,
            AttachmentFile::Raw(raw) => {
                let mut attachment = Attachment {
                    content_type: Some(raw.content_type),
                    file_key: raw.file_key,
                    file_name: Some(raw.file_name),
                    ..Default::default()
                };
                attachment.file_url = self.url_of(&attachment);
                attachment
            }
        }
    }

    fn url_of(&self, attachment: &Attachment) -> Option<String> {
        self.storage_url
            .as_deref()
            .and_then(|storage_url| attachment.url(storage_url))
    }

    /// A stored reference outside the permanent prefix has no bytes to send.
    fn is_unreadable(&self, file: &AttachmentFile) -> bool {
        matches!(file, AttachmentFile::Stored(_)) && !file.is_persisted(&self.key_prefix)
    }
}

fn unreadable(index: usize) -> ApiError {
    ApiError::InvalidAttachment {
        index,
        reason: "stored attachment is not persisted and carries no file content".to_string(),
    }
}
