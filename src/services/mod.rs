mod error;
mod s3_post_storage;

pub use error::StorageError;
pub use s3_post_storage::S3PostStorage;
