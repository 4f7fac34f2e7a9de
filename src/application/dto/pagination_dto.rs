use serde::{Deserialize, Serialize};

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationParams {
    pub page: u32,
    pub limit: u32,
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_count: Option<bool>,
}

impl PaginationParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            keyword: String::new(),
            include_count: None,
        }
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = keyword.into();
        self
    }

    pub fn include_count(mut self, include: bool) -> Self {
        self.include_count = Some(include);
        self
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

/// Product listing, optionally narrowed to one brand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductListParams {
    #[serde(flatten)]
    pub page: PaginationParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
}
