//! ページ送りの計算
//!
//! ウィジェットへ渡す `{limit, total, offset}` からページ番号を求める。

/// ページ送りの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1ページの件数
    pub limit: u32,
    /// 全件数
    pub total: u32,
    /// 現在のオフセット（0始まり）
    pub offset: u32,
}

impl Pagination {
    pub fn new(limit: u32, total: u32, offset: u32) -> Self {
        Self { limit, total, offset }
    }

    /// 総ページ数
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    /// 現在のページ（1始まり）
    pub fn current_page(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        self.offset / self.limit + 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page() < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page() > 1
    }

    pub fn next_offset(&self) -> Option<u32> {
        self.has_next().then(|| self.offset_for_page(self.current_page() + 1))
    }

    pub fn previous_offset(&self) -> Option<u32> {
        self.has_previous()
            .then(|| self.offset_for_page(self.current_page() - 1))
    }

    /// 指定ページのオフセット（範囲外は端に寄せる）
    pub fn offset_for_page(&self, page: u32) -> u32 {
        let last = self.total_pages().max(1);
        let page = page.clamp(1, last);
        (page - 1) * self.limit
    }

    /// ボタンに並べるページ番号（現在ページを中心に最大 `max_visible` 個）
    pub fn visible_pages(&self, max_visible: u32) -> Vec<u32> {
        let total = self.total_pages();
        if total == 0 || max_visible == 0 {
            return Vec::new();
        }
        let width = max_visible.min(total);
        let current = self.current_page().min(total);
        let start = current
            .saturating_sub(width / 2)
            .max(1)
            .min(total - width + 1);
        (start..start + width).collect()
    }
}
