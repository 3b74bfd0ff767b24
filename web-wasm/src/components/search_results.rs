//! 検索結果の行リスト（ヘッダーとダイアログで共用）

use crate::app::AppState;
use leptos::prelude::*;
use patient_records_common::{SearchResult, SearchView, NO_RESULTS_MESSAGE};

/// シグナルの外へ持ち出すための `SearchView` の写し
#[derive(Debug, Clone, PartialEq)]
pub enum ResultList {
    Hidden,
    Loading,
    Empty,
    Failed(String),
    Rows {
        rows: Vec<(SearchResult, bool)>,
        show_all: bool,
    },
}

impl ResultList {
    pub fn from_view(view: &SearchView<'_>) -> Self {
        match view {
            SearchView::Hidden => ResultList::Hidden,
            SearchView::Loading => ResultList::Loading,
            SearchView::Empty => ResultList::Empty,
            SearchView::Failed(message) => ResultList::Failed(message.to_string()),
            SearchView::Rows { rows, show_all } => ResultList::Rows {
                rows: rows
                    .iter()
                    .map(|row| (row.result.clone(), row.is_last))
                    .collect(),
                show_all: *show_all,
            },
        }
    }

    pub fn render<F>(self, state: AppState, on_show_all: F) -> AnyView
    where
        F: Fn() + Clone + Send + Sync + 'static,
    {
        match self {
            ResultList::Hidden => ().into_any(),
            ResultList::Loading => view! { <p class="search-status">"検索中..."</p> }.into_any(),
            ResultList::Empty => {
                view! { <p class="search-status">{NO_RESULTS_MESSAGE}</p> }.into_any()
            }
            ResultList::Failed(message) => {
                view! { <p class="search-status error">{message}</p> }.into_any()
            }
            ResultList::Rows { rows, show_all } => view! {
                <ul class="result-list">
                    {rows
                        .into_iter()
                        .map(|(result, is_last)| view! { <ResultRow result is_last state /> })
                        .collect_view()}
                </ul>
                <Show when=move || show_all>
                    <button
                        class="btn btn-link show-all"
                        on:click={
                            let on_show_all = on_show_all.clone();
                            move |_| on_show_all()
                        }
                    >
                        "すべての結果を見る"
                    </button>
                </Show>
            }
            .into_any(),
        }
    }
}

#[component]
fn ResultRow(result: SearchResult, is_last: bool, state: AppState) -> impl IntoView {
    let subtitle = result.subtitle_lines().join(" / ");
    let initial = result.name.chars().next().map(String::from).unwrap_or_default();
    let id = result.id.clone();

    view! {
        <li
            class=if is_last { "result-row last" } else { "result-row" }
            on:click=move |_| state.open_patient(id.clone())
        >
            {match result.profile_photo.clone() {
                Some(src) => view! { <img class="avatar" src=src alt="" /> }.into_any(),
                None => view! { <span class="avatar placeholder">{initial}</span> }.into_any(),
            }}
            <div class="result-text">
                <span class="result-name">{result.name.clone()}</span>
                <span class="result-subtitle">{subtitle}</span>
            </div>
        </li>
    }
}
