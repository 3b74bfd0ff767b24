//! メインアプリケーションコンポーネント

use crate::api::WebGateway;
use crate::components::{
    feed::Feed, header::Header, record_modal::RecordModal, search_dialog::SearchDialog,
};
use crate::query::{provide_query_client, QueryClient};
use crate::route::read_route;
use leptos::prelude::*;
use leptos::task::spawn_local;
use patient_records_common::{
    fetch_search, RouteQuery, SearchController, SearchRequest, SEARCH_QUERY_KEY,
};

/// 画面全体の状態
#[derive(Clone, Copy)]
pub struct AppState {
    pub api: StoredValue<WebGateway>,
    pub route: StoredValue<RouteQuery>,
    pub search: RwSignal<SearchController>,
    /// 全件表示の検索ダイアログ
    pub search_dialog: RwSignal<bool>,
    /// 記録ビューアで開いている患者
    pub selected: RwSignal<Option<String>>,
}

impl AppState {
    /// 検索を実行して結果を反映する
    pub fn dispatch_search(&self, query: &QueryClient, request: Option<SearchRequest>) {
        let Some(request) = request else {
            return;
        };
        let api = self.api.get_value();
        let cache = query.cache.clone();
        let search = self.search;
        spawn_local(async move {
            let result = fetch_search(&api, &cache, &request.query).await;
            search.update(|s| {
                s.resolve(request.ticket, result);
            });
        });
    }

    pub fn open_patient(&self, id: String) {
        self.search.update(|s| s.click_outside());
        self.search_dialog.set(false);
        self.selected.set(Some(id));
    }
}

pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let query = provide_query_client();
    let route = read_route();

    let mut controller = SearchController::new();
    let initial = route
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| controller.set_text(s));

    let state = AppState {
        api: StoredValue::new(WebGateway::from_document()),
        route: StoredValue::new(route),
        search: RwSignal::new(controller),
        search_dialog: RwSignal::new(false),
        selected: RwSignal::new(None),
    };
    provide_context(state);
    state.dispatch_search(&query, initial);

    // プロフィール保存で検索キャッシュが捨てられたら、表示中の検索を取り直す
    Effect::new({
        let query = query.clone();
        move |previous: Option<u64>| {
            let epoch = query.epoch();
            if previous.is_some_and(|p| p != epoch) {
                let request = state.search.try_update(|s| s.refresh()).flatten();
                state.dispatch_search(&query, request);
            }
            epoch
        }
    });

    view! {
        <div class="container">
            <Header />
            <main>
                <Feed />
            </main>
            <SearchDialog />
            <RecordModal />
        </div>
    }
}

/// 検索キャッシュの世代を画面へ反映する
pub fn notify_search_invalidated(query: &QueryClient) {
    query.sync(SEARCH_QUERY_KEY);
}
