//! 分页相关的数据结构

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            per_page: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PaginationParams {
    pub fn new(page: Option<u64>, per_page: Option<u64>) -> Self {
        Self { page, per_page }
    }

    pub fn get_page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_limit(&self) -> u64 {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn get_offset(&self) -> u64 {
        (self.get_page() - 1) * self.get_limit()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total: u64) -> Self {
        let per_page = params.get_limit();
        Self {
            data,
            page: params.get_page(),
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let p = PaginationParams::new(Some(3), Some(10));
        assert_eq!(p.get_offset(), 20);
        assert_eq!(p.get_limit(), 10);
    }

    #[test]
    fn test_defaults_and_clamping() {
        let p = PaginationParams::new(Some(0), Some(1000));
        assert_eq!(p.get_page(), 1);
        assert_eq!(p.get_limit(), MAX_PAGE_SIZE);
        assert_eq!(PaginationParams::default().get_limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages() {
        let p = PaginationParams::new(Some(1), Some(20));
        let r = PaginatedResponse::new(vec![1, 2, 3], &p, 41);
        assert_eq!(r.total_pages, 3);
        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], &p, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
