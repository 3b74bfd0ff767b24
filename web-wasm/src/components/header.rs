//! ヘッダーコンポーネント

use crate::components::search_box::SearchBox;
use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"患者記録"</h1>
            <SearchBox />
        </header>
    }
}
