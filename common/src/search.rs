//! 患者名のインクリメンタル検索
//!
//! 入力のたびに検索を発行する（空文字のときは発行しない）。
//! 表示は2種類:
//! - コンパクト表示: ヘッダーの検索欄の下に最大3件
//! - ダイアログ表示: 件数制限なし

use crate::api::PatientApi;
use crate::cache::{QueryCache, SEARCH_QUERY_KEY};
use crate::error::{Error, Result};
use crate::lifecycle::{FetchGate, Ticket};
use crate::types::SearchResult;

/// コンパクト表示の最大件数
pub const COMPACT_RESULT_LIMIT: usize = 3;

/// 検索結果が空のときの表示
pub const NO_RESULTS_MESSAGE: &str = "該当する患者が見つかりません";

/// 発行すべき検索
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: Ticket,
    pub query: String,
}

/// 結果リストの1行
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow<'a> {
    pub result: &'a SearchResult,
    /// 短いリストの末尾（下線なしのスタイル）
    pub is_last: bool,
}

/// 検索パネルの表示内容
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView<'a> {
    /// パネルを出さない
    Hidden,
    Loading,
    Empty,
    Rows {
        rows: Vec<ResultRow<'a>>,
        /// 「すべての結果を見る」ボタン
        show_all: bool,
    },
    Failed(&'a str),
}

/// ページのURLクエリ（`?search=...&page=...`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuery {
    pub search: Option<String>,
    pub page: Option<String>,
}

/// クリア操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// 入力欄だけ空にした
    InputOnly,
    /// URLを書き換えて画面を再読み込みする
    Reload(RouteQuery),
}

#[derive(Debug, Clone, Default)]
pub struct SearchController {
    text: String,
    panel_open: bool,
    results: FetchGate<Vec<SearchResult>>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 入力が変わった。空でなければ検索を発行する
    pub fn set_text(&mut self, text: impl Into<String>) -> Option<SearchRequest> {
        let text = text.into();
        if text == self.text && self.results.is_open() {
            return None;
        }
        self.text = text;
        if self.text.is_empty() {
            self.results.close();
            return None;
        }
        let ticket = self.results.open();
        Some(SearchRequest {
            ticket,
            query: self.text.clone(),
        })
    }

    /// キャッシュが無効化されたときの再検索
    pub fn refresh(&mut self) -> Option<SearchRequest> {
        if self.text.is_empty() {
            return None;
        }
        let ticket = self.results.open();
        Some(SearchRequest {
            ticket,
            query: self.text.clone(),
        })
    }

    pub fn resolve(&mut self, ticket: Ticket, result: Result<Vec<SearchResult>>) -> bool {
        self.results.resolve(ticket, result)
    }

    /// 入力欄をクリックした
    pub fn focus(&mut self) {
        self.panel_open = true;
    }

    /// 入力欄とパネルの外をクリックした（入力は残す）
    pub fn click_outside(&mut self) {
        self.panel_open = false;
    }

    /// クリアボタン
    pub fn clear(&mut self) {
        self.text.clear();
        self.results.close();
    }

    /// クリアボタン（URLクエリと連動するページ用）
    ///
    /// URLに検索語が残っている場合は `search` を空、`page` を 1 に戻して再読み込みする。
    pub fn clear_with_route(&mut self, route: &RouteQuery) -> ClearOutcome {
        self.clear();
        if route.search.as_deref() == Some("") {
            return ClearOutcome::InputOnly;
        }
        ClearOutcome::Reload(RouteQuery {
            search: Some(String::new()),
            page: Some("1".to_string()),
        })
    }

    pub fn is_loading(&self) -> bool {
        self.results.is_loading()
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// パネルを表示するか
    pub fn panel_visible(&self) -> bool {
        self.panel_open && (!self.text.is_empty() || self.is_loading())
    }

    pub fn results(&self) -> &[SearchResult] {
        self.results.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// ヘッダー検索欄の表示
    pub fn compact_view(&self) -> SearchView<'_> {
        if !self.panel_visible() {
            return SearchView::Hidden;
        }
        self.view(Some(COMPACT_RESULT_LIMIT))
    }

    /// 検索ダイアログの表示
    pub fn dialog_view(&self) -> SearchView<'_> {
        if self.text.is_empty() && !self.is_loading() {
            return SearchView::Hidden;
        }
        self.view(None)
    }

    fn view(&self, limit: Option<usize>) -> SearchView<'_> {
        if self.is_loading() {
            return SearchView::Loading;
        }
        let results = self.results();
        if results.is_empty() {
            if let Some(message) = self.results.error() {
                return SearchView::Failed(message);
            }
            return SearchView::Empty;
        }
        match limit {
            Some(limit) => SearchView::Rows {
                rows: compact_rows(results, limit),
                show_all: results.len() >= limit,
            },
            None => SearchView::Rows {
                rows: results
                    .iter()
                    .map(|result| ResultRow { result, is_last: false })
                    .collect(),
                show_all: false,
            },
        }
    }
}

/// 先頭 `limit` 件の行を作る。
///
/// `limit` 未満の短いリストでは最後の行だけ `is_last` になる。
/// `limit` 以上あるときは下に「すべて見る」ボタンが続くので全行に下線を付ける。
pub fn compact_rows(results: &[SearchResult], limit: usize) -> Vec<ResultRow<'_>> {
    let short = results.len() < limit;
    results
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, result)| ResultRow {
            result,
            is_last: short && i + 1 == results.len(),
        })
        .collect()
}

/// キャッシュを経由して名前検索する
pub async fn fetch_search<A: PatientApi>(
    api: &A,
    cache: &QueryCache,
    query: &str,
) -> Result<Vec<SearchResult>> {
    if query.is_empty() {
        return Err(Error::Config("empty search query".to_string()));
    }
    if let Some(hit) = cache.get::<Vec<SearchResult>>(SEARCH_QUERY_KEY, query) {
        tracing::debug!(query, "search cache hit");
        return Ok(hit);
    }
    tracing::debug!(query, "search by name");
    let results = api.search_by_name(query).await?;
    cache.put(SEARCH_QUERY_KEY, query, &results);
    Ok(results)
}
