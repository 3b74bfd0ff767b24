//! 患者フィード
//!
//! オフセットが変わるたびに1ページ取得し、取得中はスケルトンを並べる。

use crate::api::WebGateway;
use crate::app::use_app_state;
use crate::components::loading::{ErrorBanner, SkeletonCard};
use crate::components::pagination::PaginationBar;
use crate::components::patient_card::PatientCard;
use crate::route::route_page;
use leptos::prelude::*;
use leptos::task::spawn_local;
use patient_records_common::{FeedController, FeedRequest, PatientApi};

async fn fetch_into(api: &WebGateway, feed: RwSignal<FeedController>, request: FeedRequest) {
    let result = api.list_patients(request.offset).await;
    feed.update(|f| {
        f.resolve(request, result);
    });
}

#[component]
pub fn Feed() -> impl IntoView {
    let state = use_app_state();
    let feed = RwSignal::new(FeedController::new());
    let initial_page = route_page(&state.route.get_value());

    // 初回表示（URLにページ番号があれば、ページサイズが分かってから移動する）
    spawn_local(async move {
        let api = state.api.get_value();
        let Some(request) = feed.try_update(|f| f.start()) else {
            return;
        };
        fetch_into(&api, feed, request).await;
        if initial_page > 1 {
            if let Some(request) = feed.try_update(|f| f.jump_to_page(initial_page)).flatten() {
                fetch_into(&api, feed, request).await;
            }
        }
    });

    let on_change = move |offset: u32| {
        let Some(request) = feed.try_update(|f| f.set_offset(offset)).flatten() else {
            return;
        };
        let api = state.api.get_value();
        spawn_local(async move {
            fetch_into(&api, feed, request).await;
        });
    };

    let is_empty =
        move || feed.with(|f| !f.is_loading() && f.cards().is_empty() && f.error().is_none());

    view! {
        <section class="feed">
            {move || feed.with(|f| f.error().map(|m| view! { <ErrorBanner message=m.to_string() /> }))}
            <Show when=is_empty>
                <p class="text-muted">"患者が登録されていません"</p>
            </Show>
            <div class="card-grid">
                {move || {
                    (0..feed.with(|f| f.skeleton_count()))
                        .map(|_| view! { <SkeletonCard /> })
                        .collect_view()
                }}
                <For
                    each=move || feed.with(|f| f.cards().to_vec())
                    key=|patient| patient.id.clone()
                    children=move |patient| {
                        view! { <PatientCard patient=patient on_open=move |id| state.open_patient(id) /> }
                    }
                />
            </div>
            {move || {
                feed.with(|f| f.pagination())
                    .filter(|p| p.total_pages() > 1)
                    .map(|p| view! { <PaginationBar pagination=p on_change=on_change /> })
            }}
        </section>
    }
}
