pub mod endpoints;
pub mod error;
pub mod query;
pub mod query_key;
pub mod request_client;
pub mod route;
pub mod session;
pub mod upload;

pub use endpoints::{find_endpoint, Endpoint, Operation, ENDPOINTS};
pub use query_key::{query_keys, QueryKey};
pub use request_client::{
    ApiClient, MultipartField, MultipartPayload, Payload, PreparedBody, PreparedRequest,
    RequestOptions,
};
pub use route::{HttpMethod, Route};
pub use session::{Session, SessionStore};
pub use upload::{partition, Partition, Uploader};
