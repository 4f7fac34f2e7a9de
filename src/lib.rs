pub mod adapters;
pub mod application;
pub mod domain;
pub mod services;

pub use adapters::{ApiClient, Operation, Session, SessionStore, Uploader};
pub use application::error::ApiError;
pub use domain::config::client::ClientConfig;
pub use domain::models::envelope::{ApiResponse, ErrorEnvelope};
