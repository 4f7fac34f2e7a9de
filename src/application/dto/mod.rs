pub mod auth_dto;
pub mod brand_dto;
pub mod pagination_dto;
pub mod product_dto;
pub mod session_dto;
pub mod upload_dto;
