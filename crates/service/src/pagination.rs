//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

/// Pagination parameters as received from a caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: i64,
    /// items per page
    pub per_page: i64,
}

impl Pagination {
    pub const MAX_PER_PAGE: i64 = 100;

    pub fn new(page: i64, per_page: i64) -> Self { Self { page, per_page } }

    /// Page defaults to 1 when not positive; `per_page` is clamped to `1..=100`.
    pub fn normalize(self) -> Self {
        let page = if self.page <= 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, Self::MAX_PER_PAGE);
        Self { page, per_page }
    }

    pub fn limit(&self) -> u64 { self.per_page.max(1) as u64 }

    /// Rows to skip before this page.
    pub fn offset(&self) -> u64 {
        ((self.page.max(1) - 1) as u64).saturating_mul(self.limit())
    }

    /// `ceil(total / per_page)`
    pub fn total_pages(&self, total: u64) -> u64 { total.div_ceil(self.limit()) }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 10 } }
}
