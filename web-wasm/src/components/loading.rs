//! 読み込み中の表示

use leptos::prelude::*;

/// 上に重ねる読み込み中オーバーレイ
#[component]
pub fn LoadingOverlay<F>(when: F) -> impl IntoView
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    view! {
        <Show when=when>
            <div class="loading-overlay">
                <div class="spinner" />
                <p class="loading-text">"読み込み中..."</p>
            </div>
        </Show>
    }
}

/// カードの形をしたプレースホルダ
#[component]
pub fn SkeletonCard() -> impl IntoView {
    view! {
        <div class="patient-card skeleton">
            <div class="skeleton-photo" />
            <div class="skeleton-line wide" />
            <div class="skeleton-line" />
            <div class="skeleton-line short" />
        </div>
    }
}

/// 失敗時のバナー
#[component]
pub fn ErrorBanner(message: String) -> impl IntoView {
    view! {
        <div class="error-banner" role="alert">
            <span>"⚠ "</span>
            {message}
        </div>
    }
}
