use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{
    query_key::QueryKey,
    route::{HttpMethod, Route},
};
use crate::{
    application::{
        dto::{
            auth_dto::{LoginForm, LoginResponse},
            brand_dto::{BrandForm, BrandRef, UpdateBrandInput},
            pagination_dto::{PaginationParams, ProductListParams},
            product_dto::{ProductForm, ProductRef, UpdateProductInput},
            session_dto::{SessionRef, SocialPlatformRef},
            upload_dto::SignatureRequest,
        },
        error::ApiError,
    },
    domain::models::{
        brand::Brand,
        dashboard::DashboardStats,
        device_session::{BrandDeviceSession, DeviceSession},
        pagination::{Paginated, Records},
        product::Product,
        scan::Scan,
        signature::SignedUploadDescriptor,
        social_account::SocialAccount,
        user::User,
    },
};

/// A named backend call with its route and input/output types.
pub trait Operation {
    const NAME: &'static str;
    const ROUTE: Route;

    type Input: Serialize + Send + Sync;
    type Output: DeserializeOwned;

    fn endpoint() -> Endpoint {
        Endpoint {
            name: Self::NAME,
            route: Self::ROUTE,
        }
    }

    /// Key for invalidating every cached call of this operation.
    fn query_key() -> QueryKey {
        QueryKey::new(Self::NAME)
    }

    fn query_key_for<P: Serialize + ?Sized>(params: &P) -> Result<QueryKey, ApiError> {
        QueryKey::new(Self::NAME).with(params)
    }
}

/// Untyped table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub route: Route,
}

impl Endpoint {
    pub fn query_key(&self, params: &[Value]) -> QueryKey {
        params
            .iter()
            .cloned()
            .fold(QueryKey::new(self.name), QueryKey::push_value)
    }
}

macro_rules! operations {
    ($(
        $(#[$meta:meta])*
        $op:ident => $name:literal, $method:ident $path:literal, $input:ty => $output:ty;
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default)]
            pub struct $op;

            impl Operation for $op {
                const NAME: &'static str = $name;
                const ROUTE: Route = Route::new(HttpMethod::$method, $path);
                type Input = $input;
                type Output = $output;
            }
        )*

        /// Every declared operation, for lookup by name.
        pub const ENDPOINTS: &[Endpoint] = &[
            $(Endpoint { name: $name, route: Route::new(HttpMethod::$method, $path) },)*
        ];
    };
}

operations! {
    Login => "login", Post "/api/admin/login", LoginForm => LoginResponse;
    Logout => "logout", Get "/api/admin/logout", () => Value;
    Me => "me", Get "/api/admin/me", () => User;

    /// One signed descriptor per record, same order.
    GetS3Signatures => "getS3Signatures", Post "/api/common/s3_signatures",
        Records<SignatureRequest> => Records<SignedUploadDescriptor>;
    GetS3Signature => "getS3Signature", Post "/api/common/s3_signature",
        SignatureRequest => SignedUploadDescriptor;

    Dashboard => "dashboard", Get "/api/admin/dashboard", () => DashboardStats;

    PaginateBrands => "paginateBrands", Get "/api/admin/brands",
        PaginationParams => Paginated<Brand>;
    GetBrand => "getBrand", Get "/api/admin/brands/:brand_id", BrandRef => Brand;
    CreateBrand => "createBrand", Post "/api/admin/brands", BrandForm => Brand;
    UpdateBrand => "updateBrand", Put "/api/admin/brands/:brand_id", UpdateBrandInput => Brand;
    DeleteBrand => "deleteBrand", Delete "/api/admin/brands/:brand_id", BrandRef => Value;

    CreateBrandProduct => "createBrandProduct", Post "/api/admin/brand_products",
        ProductForm => Product;
    UpdateBrandProduct => "updateBrandProduct", Put "/api/admin/brand_products/:product_id",
        UpdateProductInput => Product;
    DeleteBrandProduct => "deleteBrandProduct", Delete "/api/admin/brand_products/:product_id",
        ProductRef => Value;
    PaginateProducts => "paginateProducts", Get "/api/admin/brand_products",
        ProductListParams => Paginated<Product>;
    GetProduct => "getProduct", Get "/api/admin/brand_products/:product_id",
        ProductRef => Product;
    /// Returns the shareable scan URL for a product.
    GenerateProductScanUrl => "generateProductScanUrl",
        Post "/api/admin/brand_products/:product_id/scan_url", ProductRef => String;

    PaginateDeviceSessions => "paginateDeviceSessions", Get "/api/admin/device_sessions",
        PaginationParams => Paginated<DeviceSession>;
    GetDeviceSession => "getDeviceSession", Get "/api/admin/device_sessions/:session_id",
        SessionRef => DeviceSession;
    PaginateBrandDeviceSessions => "paginateBrandDeviceSessions",
        Get "/api/admin/brand_device_sessions", PaginationParams => Paginated<BrandDeviceSession>;
    GetBrandDeviceSession => "getBrandDeviceSession",
        Get "/api/admin/brand_device_sessions/:session_id", SessionRef => BrandDeviceSession;

    PaginateScans => "paginateScans", Get "/api/admin/scans", PaginationParams => Paginated<Scan>;

    GetSocialAccounts => "getSocialAccounts", Get "/api/admin/social_accounts",
        () => Records<SocialAccount>;
    RemoveSocialAccount => "removeSocialAccount", Delete "/api/admin/social_accounts/:platform",
        SocialPlatformRef => Value;
}

pub fn find_endpoint(name: &str) -> Result<&'static Endpoint, ApiError> {
    ENDPOINTS
        .iter()
        .find(|endpoint| endpoint.name == name)
        .ok_or_else(|| ApiError::configuration(format!("unknown operation `{}`", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn operation_names_are_unique() {
        let names: HashSet<&str> = ENDPOINTS.iter().map(|e| e.name).collect();
        assert_eq!(names.len(), ENDPOINTS.len());
    }

    #[test]
    fn typed_and_table_routes_agree() {
        assert_eq!(find_endpoint("updateBrand").unwrap(), &UpdateBrand::endpoint());
        assert_eq!(PaginateBrands::ROUTE.method, HttpMethod::Get);
        assert_eq!(DeleteBrandProduct::ROUTE.placeholders(), vec!["product_id"]);
        assert!(find_endpoint("paginateWidgets").is_err());
    }

    #[test]
    fn every_placeholder_is_a_field_of_the_input() {
        let samples: Vec<(&str, Value)> = vec![
            ("getBrand", serde_json::to_value(BrandRef::new("b1")).unwrap()),
            ("getProduct", serde_json::to_value(ProductRef::new("p1")).unwrap()),
            ("getDeviceSession", serde_json::to_value(SessionRef::new("s1")).unwrap()),
            ("removeSocialAccount", json!({"platform": "tiktok"})),
        ];
        for (name, input) in samples {
            let endpoint = find_endpoint(name).unwrap();
            for placeholder in endpoint.route.placeholders() {
                assert!(input.get(placeholder).is_some(), "{} misses {}", name, placeholder);
            }
        }
    }

    #[test]
    fn query_keys_start_with_operation_name() {
        let key = PaginateBrands::query_key_for(&PaginationParams::new(1, 10)).unwrap();
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            json!(["paginateBrands", {"page": 1, "limit": 10, "keyword": ""}])
        );
        assert!(PaginateBrands::query_key().is_prefix_of(&key));
        assert_eq!(
            find_endpoint("getBrand").unwrap().query_key(&[json!("b1")]),
            GetBrand::query_key().push_value(json!("b1"))
        );
    }
}
