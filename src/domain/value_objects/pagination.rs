use crate::domain::constants::DEFAULT_PER_PAGE;
use serde::{Deserialize, Serialize};

/// 1 始まりのページ指定。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }
}

/// 一覧ビューに付随するページングメタデータ。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: 0,
            has_next: false,
            has_previous: false,
        }
    }
}

impl PageInfo {
    /// サーバーの件数情報からページ数を算出する。`total_pages = ceil(count / per_page)`。
    pub fn from_count(
        request: PageRequest,
        total_count: u64,
        has_next: bool,
        has_previous: bool,
    ) -> Self {
        let per_page = u64::from(request.per_page.max(1));
        let total_pages = total_count.div_ceil(per_page).max(1);
        Self {
            current_page: request.page,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            total_count,
            has_next,
            has_previous,
        }
    }

    /// 検索結果などページングしない一覧のメタデータ。
    pub fn single_page(total_count: u64) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count,
            has_next: false,
            has_previous: false,
        }
    }
}
