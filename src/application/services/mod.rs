mod credential_provider;
mod object_storage;

pub use credential_provider::CredentialProvider;
pub use object_storage::ObjectStorage;
