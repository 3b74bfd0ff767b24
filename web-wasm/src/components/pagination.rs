//! ページ送りウィジェット

use leptos::prelude::*;
use patient_records_common::Pagination;

const PAGE_BUTTONS: u32 = 5;

#[component]
pub fn PaginationBar<F>(pagination: Pagination, on_change: F) -> impl IntoView
where
    F: Fn(u32) + Clone + Send + Sync + 'static,
{
    let current = pagination.current_page();
    let previous = pagination.previous_offset();
    let next = pagination.next_offset();

    let go = move |offset: Option<u32>| {
        let on_change = on_change.clone();
        move |_: leptos::ev::MouseEvent| {
            if let Some(offset) = offset {
                on_change(offset);
            }
        }
    };

    view! {
        <nav class="pagination">
            <button class="page-btn" disabled=previous.is_none() on:click=go(previous)>"‹"</button>
            {pagination
                .visible_pages(PAGE_BUTTONS)
                .into_iter()
                .map(|page| {
                    let offset = pagination.offset_for_page(page);
                    view! {
                        <button
                            class=if page == current { "page-btn active" } else { "page-btn" }
                            on:click=go(Some(offset))
                        >
                            {page}
                        </button>
                    }
                })
                .collect_view()}
            <button class="page-btn" disabled=next.is_none() on:click=go(next)>"›"</button>
            <span class="page-info">
                {format!("{}/{}ページ (全{}件)", current, pagination.total_pages(), pagination.total)}
            </span>
        </nav>
    }
}
