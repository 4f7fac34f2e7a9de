use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key prefix the storage provider uses for objects that have been persisted.
pub const PERMANENT_KEY_PREFIX: &str = "uploads/";

const OCTET_STREAM: &str = "application/octet-stream";

/// Reference to binary content held in object storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Attachment {
    pub fn is_persisted(&self, prefix: &str) -> bool {
        has_permanent_key(self.file_key.as_deref(), prefix)
    }

    /// Public URL of the object under `storage_url`, if the attachment has a key.
    pub fn url(&self, storage_url: &str) -> Option<String> {
        self.file_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| format!("{}/{}", storage_url.trim_end_matches('/'), key))
    }
}

/// A file held in memory that has not been sent to object storage yet.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub content: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub uid: String,
    /// Key left behind by an earlier upload attempt, if any.
    pub file_key: Option<String>,
}

impl RawFile {
    pub fn new(content: Vec<u8>, file_name: String, content_type: String) -> Self {
        Self {
            content,
            file_name,
            content_type,
            uid: uuid::Uuid::new_v4().to_string(),
            file_key: None,
        }
    }

    /// Builds the file with a content type guessed from its name.
    pub fn guessed(content: Vec<u8>, file_name: String) -> Self {
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self::new(content, file_name, content_type)
    }

    pub fn with_file_key(mut self, file_key: impl Into<String>) -> Self {
        self.file_key = Some(file_key.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Type to sign and send. Empty or malformed types become octet-stream.
    pub fn mime_type(&self) -> String {
        match self.content_type.trim().parse::<mime_guess::Mime>() {
            Ok(mime) => mime.to_string(),
            Err(_) => OCTET_STREAM.to_string(),
        }
    }
}

/// A file field value: either something already in storage or raw bytes.
#[derive(Debug, Clone)]
pub enum AttachmentFile {
    Stored(Attachment),
    Raw(RawFile),
}

impl AttachmentFile {
    pub fn file_key(&self) -> Option<&str> {
        match self {
            AttachmentFile::Stored(attachment) => attachment.file_key.as_deref(),
            AttachmentFile::Raw(file) => file.file_key.as_deref(),
        }
    }

    /// Only the key prefix decides; a key outside the prefix is a leftover.
    pub fn is_persisted(&self, prefix: &str) -> bool {
        has_permanent_key(self.file_key(), prefix)
    }

    pub fn file_name(&self) -> &str {
        match self {
            AttachmentFile::Stored(attachment) => attachment.file_name.as_deref().unwrap_or(""),
            AttachmentFile::Raw(file) => &file.file_name,
        }
    }
}

impl From<Attachment> for AttachmentFile {
    fn from(value: Attachment) -> Self {
        AttachmentFile::Stored(value)
    }
}

impl From<RawFile> for AttachmentFile {
    fn from(value: RawFile) -> Self {
        AttachmentFile::Raw(value)
    }
}

fn has_permanent_key(file_key: Option<&str>, prefix: &str) -> bool {
    file_key.is_some_and(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persisted_only_with_permanent_prefix() {
        let stored = Attachment {
            file_key: Some("uploads/abc.png".to_string()),
            ..Default::default()
        };
        assert!(stored.is_persisted(PERMANENT_KEY_PREFIX));

        let remnant = Attachment {
            file_key: Some("tmp/abc.png".to_string()),
            ..Default::default()
        };
        assert!(!remnant.is_persisted(PERMANENT_KEY_PREFIX));
        assert!(!Attachment::default().is_persisted(PERMANENT_KEY_PREFIX));
    }

    #[test]
    fn raw_file_with_leftover_key_is_not_persisted() {
        let file = RawFile::new(vec![1, 2, 3], "a.png".into(), "image/png".into())
            .with_file_key("staging/a.png");
        assert!(!AttachmentFile::Raw(file).is_persisted(PERMANENT_KEY_PREFIX));
    }

    #[test]
    fn url_joins_storage_and_key() {
        let attachment = Attachment {
            file_key: Some("uploads/logo.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            attachment.url("https://cdn.example.com/"),
            Some("https://cdn.example.com/uploads/logo.png".to_string())
        );
        assert_eq!(Attachment::default().url("https://cdn.example.com"), None);
    }

    #[test]
    fn content_type_is_guessed_from_the_name() {
        assert_eq!(RawFile::guessed(vec![], "report.csv".into()).content_type, "text/csv");
        assert_eq!(RawFile::guessed(vec![], "clip.webm".into()).content_type, "video/webm");
        assert_eq!(
            RawFile::guessed(vec![], "no-extension".into()).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn blank_or_malformed_type_falls_back_to_octet_stream() {
        let blank = RawFile::new(vec![1], "clip".into(), String::new());
        assert_eq!(blank.mime_type(), "application/octet-stream");

        let malformed = RawFile::new(vec![1], "clip".into(), "not a type".into());
        assert_eq!(malformed.mime_type(), "application/octet-stream");

        let png = RawFile::new(vec![1], "a.png".into(), "image/png".into());
        assert_eq!(png.mime_type(), "image/png");
    }

    #[test]
    fn file_name_prefers_raw_name() {
        let raw = AttachmentFile::Raw(RawFile::new(vec![], "raw.jpg".into(), "image/jpeg".into()));
        assert_eq!(raw.file_name(), "raw.jpg");
        assert_eq!(AttachmentFile::Stored(Attachment::default()).file_name(), "");
    }
}
