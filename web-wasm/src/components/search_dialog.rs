//! 検索結果をすべて表示するダイアログ

use crate::app::use_app_state;
use crate::components::search_results::ResultList;
use crate::query::use_query_client;
use leptos::prelude::*;

#[component]
pub fn SearchDialog() -> impl IntoView {
    let state = use_app_state();
    let query = use_query_client();

    let on_input = move |ev| {
        let text = event_target_value(&ev);
        let request = state.search.try_update(|s| s.set_text(text)).flatten();
        state.dispatch_search(&query, request);
    };

    view! {
        <Show when=move || state.search_dialog.get()>
            <div class="modal-backdrop" on:click=move |_| state.search_dialog.set(false) />
            <div class="modal search-dialog" role="dialog">
                <div class="modal-header">
                    <h2>"検索結果"</h2>
                    <button class="modal-close" on:click=move |_| state.search_dialog.set(false)>"×"</button>
                </div>
                <input
                    type="text"
                    class="search-dialog-input"
                    placeholder="患者名で検索"
                    prop:value=move || state.search.with(|s| s.text().to_string())
                    on:input=on_input.clone()
                />
                <div class="modal-body scroll">
                    {move || {
                        state
                            .search
                            .with(|s| ResultList::from_view(&s.dialog_view()))
                            .render(state, || {})
                    }}
                </div>
            </div>
        </Show>
    }
}
