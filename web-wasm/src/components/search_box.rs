//! ヘッダーの検索欄（最大3件のパネル付き）

use crate::app::use_app_state;
use crate::components::search_results::ResultList;
use crate::query::use_query_client;
use crate::route::navigate;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use patient_records_common::ClearOutcome;
use wasm_bindgen::JsCast;

#[component]
pub fn SearchBox() -> impl IntoView {
    let state = use_app_state();
    let query = use_query_client();
    let wrapper = NodeRef::<html::Div>::new();

    // 入力欄とパネルの外をクリックしたら閉じる（入力は残す）
    let handle = window_event_listener(ev::click, move |ev| {
        let Some(wrapper) = wrapper.get_untracked() else {
            return;
        };
        let inside = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
            .is_some_and(|node| wrapper.contains(Some(&node)));
        if !inside && state.search.with_untracked(|s| s.is_panel_open()) {
            state.search.update(|s| s.click_outside());
        }
    });
    on_cleanup(move || handle.remove());

    let on_input = {
        let query = query.clone();
        move |ev| {
            let text = event_target_value(&ev);
            let request = state.search.try_update(|s| s.set_text(text)).flatten();
            state.dispatch_search(&query, request);
        }
    };

    let on_clear = move |_| {
        let route = state.route.get_value();
        let outcome = state.search.try_update(|s| s.clear_with_route(&route));
        if let Some(ClearOutcome::Reload(next)) = outcome {
            navigate(&next);
        }
    };

    let view_rows = move || state.search.with(|s| ResultList::from_view(&s.compact_view()));

    view! {
        <div class="search-box" node_ref=wrapper>
            <div class="search-input">
                <span class="search-icon">"🔍"</span>
                <input
                    type="text"
                    placeholder="患者名で検索"
                    prop:value=move || state.search.with(|s| s.text().to_string())
                    on:input=on_input
                    on:click=move |_| state.search.update(|s| s.focus())
                />
                <Show when=move || state.search.with(|s| !s.text().is_empty())>
                    <button class="search-clear" title="クリア" on:click=on_clear>"×"</button>
                </Show>
            </div>
            <Show when=move || state.search.with(|s| s.panel_visible())>
                <div class="search-panel">
                    {move || view_rows().render(state, move || state.search_dialog.set(true))}
                </div>
            </Show>
        </div>
    }
}
