//! Pagination helpers for list endpoints.
//!
//! Query values are parsed leniently: missing, unparsable or non-positive
//! values fall back to the defaults, and `limit` is capped.

/// Normalized 1-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn from_query(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = positive(page).unwrap_or(Self::DEFAULT_PAGE);
        let limit = positive(limit)
            .unwrap_or(Self::DEFAULT_LIMIT)
            .min(Self::MAX_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: Self::DEFAULT_PAGE, limit: Self::DEFAULT_LIMIT }
    }
}

fn positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|v| v.trim().parse::<i64>().ok()).filter(|v| *v > 0)
}
