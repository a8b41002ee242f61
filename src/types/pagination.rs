//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::domain::ProductSummary;

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: u64,
    /// Items per page (at most 100)
    #[serde(default = "default_per_page")]
    #[param(example = 20)]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    /// Page number, with 0 read as the first page
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Page size kept within 1..=MAX_PAGE_SIZE
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip before the current page
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(ProductPage = Paginated<ProductSummary>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let params = PaginationParams { page: 1, per_page: 0 };
        assert_eq!(params.limit(), 1);

        let params = PaginationParams { page: 1, per_page: 10_000 };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let params = PaginationParams { page: 0, per_page: 20 };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);

        let params = PaginationParams { page: 3, per_page: 20 };
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Paginated<u8> = Paginated::new(vec![], 1, 20, 41);
        assert_eq!(page.meta.total_pages, 3);

        let page: Paginated<u8> = Paginated::new(vec![], 1, 20, 0);
        assert_eq!(page.meta.total_pages, 0);
    }
}
