pub mod attachment;
pub mod brand;
pub mod dashboard;
pub mod device_session;
pub mod envelope;
pub mod nullable;
pub mod pagination;
pub mod product;
pub mod scan;
pub mod signature;
pub mod social_account;
pub mod user;
