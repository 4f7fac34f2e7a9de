use std::{borrow::Cow, fmt, str::FromStr};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use crate::application::error::ApiError;

/// Characters `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(ApiError::configuration(format!(
                "unsupported HTTP method `{}`",
                other
            ))),
        }
    }
}

/// Method plus path template, e.g. `PUT /api/admin/brands/:brand_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: HttpMethod,
    pub path: Cow<'static, str>,
}

impl Route {
    pub const fn new(method: HttpMethod, path: &'static str) -> Self {
        Self {
            method,
            path: Cow::Borrowed(path),
        }
    }

    /// Parses a `"METHOD /path"` descriptor; a bare path means GET.
    pub fn parse(descriptor: &str) -> Result<Self, ApiError> {
        let descriptor = descriptor.trim();
        let (method, path) = match descriptor.split_once(' ') {
            Some((method, path)) => (method.parse()?, path.trim()),
            None => (HttpMethod::Get, descriptor),
        };
        if path.is_empty() {
            return Err(ApiError::configuration(format!(
                "route `{}` has no path",
                descriptor
            )));
        }
        Ok(Self {
            method,
            path: Cow::Owned(path.to_string()),
        })
    }

    /// Names of the `:param` placeholders, in path order.
    pub fn placeholders(&self) -> Vec<&str> {
        let (_, path) = split_origin(&self.path);
        scan_placeholders(path)
            .into_iter()
            .map(|(start, end)| &path[start + 1..end])
            .collect()
    }

    /// Fills every placeholder from `params` and removes the consumed fields.
    ///
    /// Fails without touching `params` when a placeholder has no usable value.
    pub fn compile(&self, params: &mut Map<String, Value>) -> Result<String, ApiError> {
        let (origin, path) = split_origin(&self.path);
        let spans = scan_placeholders(path);

        let mut compiled = String::with_capacity(path.len());
        compiled.push_str(origin);
        let mut cursor = 0;
        for &(start, end) in &spans {
            let name = &path[start + 1..end];
            let segment = match params.get(name) {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                Some(_) | None => {
                    return Err(ApiError::configuration(format!(
                        "route `{}` expects a value for `:{}`",
                        self.path, name
                    )))
                }
            };
            compiled.push_str(&path[cursor..start]);
            compiled.extend(utf8_percent_encode(&segment, COMPONENT));
            cursor = end;
        }
        compiled.push_str(&path[cursor..]);

        for (start, end) in spans {
            params.shift_remove(&path[start + 1..end]);
        }
        Ok(compiled)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Splits `scheme://host` off an absolute URL so its port colon is not a placeholder.
fn split_origin(path: &str) -> (&str, &str) {
    let Some(scheme_end) = path.find("://") else {
        return ("", path);
    };
    if !path[..scheme_end].chars().all(|c| c.is_ascii_alphabetic()) || scheme_end == 0 {
        return ("", path);
    }
    let host_start = scheme_end + 3;
    let host_end = path[host_start..]
        .find('/')
        .map(|i| host_start + i)
        .unwrap_or(path.len());
    path.split_at(host_end)
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Byte spans `[colon, end)` of each placeholder.
fn scan_placeholders(path: &str) -> Vec<(usize, usize)> {
    let bytes = path.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b':' && i + 1 < bytes.len() && is_name_char(bytes[i + 1]) {
            let start = i;
            i += 1;
            while i < bytes.len() && is_name_char(bytes[i]) {
                i += 1;
            }
            spans.push((start, i));
        } else {
            i += 1;
        }
    }
    spans
}
