//! 患者フィード（ページ送り）
//!
//! オフセットが変わるたびに1ページ分を取り直す。
//! 取得中はカードの代わりにスケルトンを6枚並べる。

use crate::api::PatientApi;
use crate::error::Result;
use crate::lifecycle::{FetchGate, Ticket};
use crate::pagination::Pagination;
use crate::types::{FeedPage, PatientSummary};

/// 読み込み中に出すスケルトンの枚数
pub const SKELETON_COUNT: usize = 6;

/// 発行すべきページ取得
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRequest {
    pub ticket: Ticket,
    pub offset: u32,
}

#[derive(Debug, Clone, Default)]
pub struct FeedController {
    offset: u32,
    page: FetchGate<FeedPage>,
}

impl FeedController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// 初回表示（現在のオフセットで取得）
    pub fn start(&mut self) -> FeedRequest {
        FeedRequest {
            ticket: self.page.open(),
            offset: self.offset,
        }
    }

    /// オフセット変更。変わらなければ何もしない
    pub fn set_offset(&mut self, offset: u32) -> Option<FeedRequest> {
        if offset == self.offset && self.page.is_open() {
            return None;
        }
        self.offset = offset;
        Some(self.start())
    }

    pub fn next(&mut self) -> Option<FeedRequest> {
        let offset = self.pagination()?.next_offset()?;
        self.set_offset(offset)
    }

    pub fn previous(&mut self) -> Option<FeedRequest> {
        let offset = self.pagination()?.previous_offset()?;
        self.set_offset(offset)
    }

    /// ページ番号（1始まり）へ移動
    pub fn jump_to_page(&mut self, page: u32) -> Option<FeedRequest> {
        let offset = self.pagination()?.offset_for_page(page);
        self.set_offset(offset)
    }

    pub fn resolve(&mut self, request: FeedRequest, result: Result<FeedPage>) -> bool {
        if request.offset != self.offset {
            tracing::debug!(
                requested = request.offset,
                current = self.offset,
                "discarding page for superseded offset"
            );
            return false;
        }
        self.page.resolve(request.ticket, result)
    }

    pub fn is_loading(&self) -> bool {
        self.page.is_loading()
    }

    /// 表示するスケルトンの枚数
    pub fn skeleton_count(&self) -> usize {
        if self.is_loading() {
            SKELETON_COUNT
        } else {
            0
        }
    }

    /// 表示するカード（読み込み中は空）
    pub fn cards(&self) -> &[PatientSummary] {
        if self.is_loading() {
            return &[];
        }
        self.page.data().map(|p| p.results.as_slice()).unwrap_or(&[])
    }

    /// ページ送りの情報（一度も取得できていなければ None）
    pub fn pagination(&self) -> Option<Pagination> {
        let info = self.page.data()?.info;
        Some(Pagination::new(info.size, info.length, self.offset))
    }

    pub fn error(&self) -> Option<&str> {
        self.page.error()
    }
}

/// 1ページ取得して反映する
pub async fn load_page<A: PatientApi>(
    api: &A,
    feed: &mut FeedController,
    request: FeedRequest,
) -> bool {
    tracing::debug!(offset = request.offset, "fetching patient page");
    let result = api.list_patients(request.offset).await;
    feed.resolve(request, result)
}
