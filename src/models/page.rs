use serde::Serialize;

/// Validated page/limit pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Parses raw query values, falling back to `default_limit` and capping
    /// at `max_limit`. Zero or non-numeric values are rejected.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<Self, String> {
        let page = match page.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_positive(raw, "page")?,
            None => 1,
        };
        let limit = match limit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_positive(raw, "limit")?,
            None => default_limit,
        };
        let limit = if limit > max_limit {
            tracing::debug!("Limit {} exceeds max {}, capping to max", limit, max_limit);
            max_limit
        } else {
            limit
        };
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

fn parse_positive(raw: &str, name: &str) -> Result<u32, String> {
    match raw.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(format!("Invalid {} parameter: {}", name, raw)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub items_per_page: u32,
}

impl Pagination {
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        Self {
            current_page: request.page,
            total_pages: total_items.div_ceil(request.limit as u64),
            total_items,
            items_per_page: request.limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), pagination: self.pagination }
    }
}
