use std::sync::Arc;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    multipart::{Form, Part},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::{
    endpoints::{Endpoint, Operation},
    query::to_query_string,
    route::HttpMethod,
};
use crate::{
    application::{error::ApiError, services::CredentialProvider},
    domain::{
        config::client::ClientConfig,
        models::{attachment::RawFile, envelope::ApiResponse},
    },
};

/// What a call sends besides its path parameters.
#[derive(Debug, Clone)]
pub enum Payload {
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

impl Payload {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(|e| ApiError::configuration(format!("payload is not serializable: {}", e)))
    }
}

#[derive(Debug, Clone)]
pub enum MultipartField {
    Text(String),
    File(RawFile),
}

/// A form body sent as-is. `params` only feed the route's placeholders;
/// whatever they leave over is added as text fields.
#[derive(Debug, Clone, Default)]
pub struct MultipartPayload {
    pub params: Map<String, Value>,
    pub fields: Vec<(String, MultipartField)>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields
            .push((name.into(), MultipartField::Text(value.into())));
        self
    }

    pub fn file(mut self, name: impl Into<String>, file: RawFile) -> Self {
        self.fields.push((name.into(), MultipartField::File(file)));
        self
    }

    fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.params {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            form = form.text(name, value);
        }
        for (name, field) in self.fields {
            form = match field {
                MultipartField::Text(value) => form.text(name, value),
                MultipartField::File(file) => {
                    let mime = file.mime_type();
                    let part = Part::bytes(file.content)
                        .file_name(file.file_name)
                        .mime_str(&mime)
                        .map_err(|e| {
                            ApiError::configuration(format!("invalid content type: {}", e))
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Merged over the default headers.
    pub headers: Vec<(String, String)>,
    /// Explicit query parameters; on GET the payload's fields follow them.
    pub params: Map<String, Value>,
    pub base_url: Option<String>,
}

impl RequestOptions {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

#[derive(Debug, Clone)]
pub enum PreparedBody {
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

/// One fully resolved call, ready to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: PreparedBody,
}

/// Typed client for the admin backend.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self::with_http_client(http, &config.api_url, credentials))
    }

    pub fn with_http_client(
        http: Client,
        base_url: &str,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying connection pool, shared with the storage uploader.
    pub fn http(&self) -> &Client {
        &self.http
    }

    pub async fn call<O: Operation>(
        &self,
        input: &O::Input,
    ) -> Result<ApiResponse<O::Output>, ApiError> {
        self.call_with::<O>(input, RequestOptions::default()).await
    }

    pub async fn call_with<O: Operation>(
        &self,
        input: &O::Input,
        options: RequestOptions,
    ) -> Result<ApiResponse<O::Output>, ApiError> {
        let payload = Payload::json(input)?;
        self.invoke(&O::endpoint(), payload, &options).await
    }

    /// Sends a form body (e.g. a create with file fields) to a typed operation.
    pub async fn call_multipart<O: Operation>(
        &self,
        payload: MultipartPayload,
        options: RequestOptions,
    ) -> Result<ApiResponse<O::Output>, ApiError> {
        self.invoke(&O::endpoint(), Payload::Multipart(payload), &options)
            .await
    }

    pub async fn invoke<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        payload: Payload,
        options: &RequestOptions,
    ) -> Result<ApiResponse<T>, ApiError> {
        let prepared = self.prepare(endpoint, payload, options).map_err(|e| {
            warn!("Could not prepare {}: {}", endpoint.name, e);
            e
        })?;
        self.dispatch(prepared).await
    }

    /// Resolves URL, query, headers and body without touching the network.
    pub fn prepare(
        &self,
        endpoint: &Endpoint,
        payload: Payload,
        options: &RequestOptions,
    ) -> Result<PreparedRequest, ApiError> {
        let route = &endpoint.route;
        let is_get = route.method == HttpMethod::Get;

        let (path, body) = match payload {
            Payload::Empty | Payload::Json(Value::Null) => {
                let path = route.compile(&mut Map::new())?;
                (path, PreparedBody::Json(Value::Object(Map::new())))
            }
            Payload::Json(Value::Object(mut fields)) => {
                let path = route.compile(&mut fields)?;
                (path, PreparedBody::Json(Value::Object(fields)))
            }
            Payload::Json(other) => {
                if is_get || !route.placeholders().is_empty() {
                    return Err(ApiError::configuration(format!(
                        "{} needs an object payload",
                        endpoint.name
                    )));
                }
                let path = route.compile(&mut Map::new())?;
                (path, PreparedBody::Json(other))
            }
            Payload::Multipart(mut form) => {
                if is_get {
                    return Err(ApiError::configuration(format!(
                        "{} is a GET and cannot carry a form body",
                        endpoint.name
                    )));
                }
                let path = route.compile(&mut form.params)?;
                (path, PreparedBody::Multipart(form))
            }
        };

        let mut query = options.params.clone();
        let body = if is_get {
            if let PreparedBody::Json(Value::Object(fields)) = body {
                query.extend(fields);
            }
            PreparedBody::Empty
        } else {
            body
        };

        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            path
        } else {
            let base = options
                .base_url
                .as_deref()
                .unwrap_or(&self.base_url)
                .trim_end_matches('/');
            format!("{}{}", base, path)
        };
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&to_query_string(&query));
        }

        let headers = self.build_headers(&body, options)?;

        debug!("Prepared {}: {} {}", endpoint.name, route.method, url);

        Ok(PreparedRequest {
            operation: endpoint.name,
            method: route.method,
            url,
            headers,
            body,
        })
    }

    fn build_headers(
        &self,
        body: &PreparedBody,
        options: &RequestOptions,
    ) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if matches!(body, PreparedBody::Json(_)) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::configuration(format!("invalid header name: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::configuration(format!("invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        if let Some(token) = self.credentials.bearer_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::configuration("bearer token is not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        prepared: PreparedRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        let PreparedRequest {
            operation,
            method,
            url,
            headers,
            body,
        } = prepared;

        info!("Calling {}: {} {}", operation, method, url);

        let mut request = self
            .http
            .request(method.to_reqwest(), &url)
            .headers(headers);
        request = match body {
            PreparedBody::Empty => request,
            PreparedBody::Json(value) => request.json(&value),
            PreparedBody::Multipart(form) => request.multipart(form.into_form()?),
        };

        let response = request.send().await.map_err(|e| {
            warn!("{} did not reach the backend: {}", operation, e);
            ApiError::from(e)
        })?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let bytes = response.bytes().await.map_err(|e| {
            warn!("{} answered {} but its body was cut off: {}", operation, status.as_u16(), e);
            ApiError::Decode {
                status: status.as_u16(),
                message: format!("response body could not be read: {}", e),
            }
        })?;
        let body = decode_body(&bytes);

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| reason.clone());
            warn!("{} failed with status {}: {}", operation, status.as_u16(), message);
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
                body,
            });
        }

        let data = serde_json::from_value::<T>(body).map_err(|e| ApiError::Decode {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        debug!("{} succeeded with status {}", operation, status.as_u16());
        Ok(ApiResponse::ok(status.as_u16(), reason, data))
    }
}

/// Empty bodies decode as `null`; non-JSON bodies as a string.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn error_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|field| body.get(field).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        endpoints::{find_endpoint, GetBrand, PaginateBrands, UpdateBrand},
        route::Route,
    };
    use serde_json::json;

    fn client(token: Option<&'static str>) -> ApiClient {
        let provider = move || token.map(str::to_string);
        ApiClient::with_http_client(Client::new(), "https://api.example.com/", Arc::new(provider))
    }

    fn json_body(prepared: &PreparedRequest) -> &Value {
        match &prepared.body {
            PreparedBody::Json(value) => value,
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn put_moves_path_field_out_of_body() {
        let prepared = client(None)
            .prepare(
                &UpdateBrand::endpoint(),
                Payload::Json(json!({"brand_id": "b1", "name": "Acme"})),
                &RequestOptions::default(),
            )
            .unwrap();

        assert_eq!(prepared.method, HttpMethod::Put);
        assert_eq!(prepared.url, "https://api.example.com/api/admin/brands/b1");
        assert_eq!(json_body(&prepared), &json!({"name": "Acme"}));
    }

    #[test]
    fn get_places_payload_in_query_in_field_order() {
        let prepared = client(None)
            .prepare(
                &PaginateBrands::endpoint(),
                Payload::Json(json!({"page": 2, "limit": 10, "keyword": ""})),
                &RequestOptions::default(),
            )
            .unwrap();

        assert_eq!(prepared.method, HttpMethod::Get);
        assert_eq!(
            prepared.url,
            "https://api.example.com/api/admin/brands?page=2&limit=10&keyword="
        );
        assert!(matches!(prepared.body, PreparedBody::Empty));
    }

    #[test]
    fn get_detail_leaves_no_placeholder_or_query() {
        let prepared = client(None)
            .prepare(
                &GetBrand::endpoint(),
                Payload::Json(json!({"brand_id": "b 1"})),
                &RequestOptions::default(),
            )
            .unwrap();
        assert_eq!(prepared.url, "https://api.example.com/api/admin/brands/b%201");
        assert!(!prepared.url.contains(":brand_id"));
        assert!(!prepared.url.contains('?'));
    }

    #[test]
    fn array_params_use_repeated_keys() {
        let endpoint = Endpoint {
            name: "listTagged",
            route: Route::new(HttpMethod::Get, "/api/admin/brand_products"),
        };
        let prepared = client(None)
            .prepare(
                &endpoint,
                Payload::Json(json!({"tags": ["a", "b"]})),
                &RequestOptions::default(),
            )
            .unwrap();
        assert!(prepared.url.ends_with("?tags=a&tags=b"));
    }

    #[test]
    fn bearer_token_attached_only_when_present() {
        let endpoint = find_endpoint("me").unwrap();
        let with_token = client(Some("t0k"))
            .prepare(endpoint, Payload::Empty, &RequestOptions::default())
            .unwrap();
        assert_eq!(with_token.headers[AUTHORIZATION], "Bearer t0k");

        let without = client(None)
            .prepare(endpoint, Payload::Empty, &RequestOptions::default())
            .unwrap();
        assert!(without.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn options_override_base_and_add_headers_and_params() {
        let options = RequestOptions::default()
            .base_url("https://staging.example.com")
            .header("x-request-id", "r1")
            .param("dry_run", true);
        let prepared = client(None)
            .prepare(
                &UpdateBrand::endpoint(),
                Payload::Json(json!({"brand_id": "b1"})),
                &options,
            )
            .unwrap();
        assert_eq!(
            prepared.url,
            "https://staging.example.com/api/admin/brands/b1?dry_run=true"
        );
        assert_eq!(prepared.headers["x-request-id"], "r1");
        assert_eq!(prepared.headers[ACCEPT], "application/json");
    }

    #[test]
    fn missing_path_field_fails_before_sending() {
        let err = client(None)
            .prepare(
                &UpdateBrand::endpoint(),
                Payload::Json(json!({"name": "Acme"})),
                &RequestOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn multipart_passes_through_without_json_encoding() {
        let form = MultipartPayload::new()
            .param("brand_id", "b1")
            .text("name", "Acme")
            .file(
                "logo_image_attachment",
                RawFile::new(vec![1, 2], "logo.png".into(), "image/png".into()),
            );
        let prepared = client(None)
            .prepare(&UpdateBrand::endpoint(), Payload::Multipart(form), &RequestOptions::default())
            .unwrap();

        assert_eq!(prepared.url, "https://api.example.com/api/admin/brands/b1");
        assert!(prepared.headers.get(CONTENT_TYPE).is_none());
        match prepared.body {
            PreparedBody::Multipart(form) => {
                assert!(form.params.is_empty());
                assert_eq!(form.fields.len(), 2);
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn decode_body_handles_empty_and_text() {
        assert_eq!(decode_body(b""), Value::Null);
        assert_eq!(decode_body(b"{\"a\":1}"), json!({"a": 1}));
        assert_eq!(decode_body(b"plain"), json!("plain"));
        assert_eq!(
            error_message(&json!({"message": "invalid brand"})),
            Some("invalid brand".to_string())
        );
    }
}
