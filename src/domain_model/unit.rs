use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: u32 = 10;

/// 1-based page request. Out-of-range values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        PageRequest { page, limit }
    }

    pub fn page(&self) -> u32 {
        if self.page < 1 {
            1
        } else {
            self.page.min(u32::MAX as i64) as u32
        }
    }

    pub fn limit(&self) -> u32 {
        if self.limit < 1 {
            DEFAULT_LIMIT
        } else {
            self.limit.min(u32::MAX as i64) as u32
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page() as u64 - 1) * self.limit() as u64
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Pagination {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(request: PageRequest, total_items: u64) -> Self {
        let page_size = request.limit();
        Pagination {
            total_items,
            total_pages: total_items.div_ceil(page_size as u64),
            current_page: request.page(),
            page_size,
        }
    }
}
