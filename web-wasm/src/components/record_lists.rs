//! 添付・検査・入院・経過報告の一覧タブ

use crate::components::loading::ErrorBanner;
use crate::components::record_modal::ViewerSignal;
use leptos::prelude::*;
use patient_records_common::{format_file_size, FileRef, RecordTab, RecordViewer, TabView};
use web_sys::File;

/// 一覧の1行（シグナルの外へ持ち出す写し）
#[derive(Debug, Clone, PartialEq)]
struct Row {
    title: String,
    meta: String,
    body: String,
    file: Option<(String, String, Option<u64>)>,
}

fn file_link(file: Option<FileRef<'_>>) -> Option<(String, String, Option<u64>)> {
    file.map(|f| (f.filename.to_string(), f.url.to_string(), f.size))
}

/// `2024-03-05T10:20:00Z` → `2024-03-05`
fn short_date(raw: &str) -> &str {
    raw.get(..10).filter(|d| d.as_bytes()[4] == b'-').unwrap_or(raw)
}

fn rows(viewer: &RecordViewer<File>, tab: RecordTab) -> Vec<Row> {
    match tab {
        RecordTab::Profile => Vec::new(),
        RecordTab::Attachments => viewer
            .files()
            .iter()
            .map(|file| Row {
                title: file.filename.clone(),
                meta: short_date(&file.created_at).to_string(),
                body: String::new(),
                file: file_link(file.file()),
            })
            .collect(),
        RecordTab::Exams => viewer
            .exams()
            .iter()
            .map(|exam| Row {
                title: exam.type_of_exam.clone(),
                meta: format!("{}  {}", short_date(&exam.date), exam.author),
                body: exam.annotations.clone(),
                file: file_link(exam.file()),
            })
            .collect(),
        RecordTab::Hospitalizations => viewer
            .hospitalizations()
            .iter()
            .map(|stay| Row {
                title: format!(
                    "{} 〜 {}",
                    short_date(&stay.entry_date),
                    short_date(&stay.departure_date)
                ),
                meta: stay.author.clone(),
                body: stay.annotations.clone(),
                file: None,
            })
            .collect(),
        RecordTab::Reports => viewer
            .reports()
            .iter()
            .map(|report| Row {
                title: report.title.clone(),
                meta: format!(
                    "{}  {}  {}",
                    short_date(&report.created_at),
                    report.shift,
                    report.author
                ),
                body: report.report_text.clone(),
                file: file_link(report.file()),
            })
            .collect(),
    }
}

#[component]
pub fn RecordList<F>(viewer: ViewerSignal, tab: RecordTab, on_register: F) -> impl IntoView
where
    F: Fn(RecordTab) + Clone + Send + Sync + 'static,
{
    let tab_view = Memo::new(move |_| viewer.with(|v| v.tab_view(tab)));
    let error = move || viewer.with(|v| v.tab_error(tab).map(str::to_string));

    view! {
        <section class="record-list">
            {move || error().map(|message| view! { <ErrorBanner message=message /> })}
            {move || match tab_view.get() {
                TabView::Closed | TabView::Loading | TabView::Failed => ().into_any(),
                TabView::Empty => {
                    view! {
                        <div class="empty-state">
                            <p class="text-muted">"登録された記録はありません"</p>
                            {tab
                                .register_label()
                                .map(|label| {
                                    let on_register = on_register.clone();
                                    view! {
                                        <button class="btn btn-primary" on:click=move |_| on_register(tab)>
                                            {label}
                                        </button>
                                    }
                                })}
                        </div>
                    }
                        .into_any()
                }
                TabView::Items(_) => {
                    view! {
                        <ul class="records">
                            {viewer
                                .with(|v| rows(v, tab))
                                .into_iter()
                                .map(|row| view! { <RecordRow row=row /> })
                                .collect_view()}
                        </ul>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}

#[component]
fn RecordRow(row: Row) -> impl IntoView {
    let Row { title, meta, body, file } = row;
    view! {
        <li class="record-row">
            <div class="record-title">{title}</div>
            <div class="record-meta">{meta}</div>
            {(!body.is_empty()).then(|| view! { <p class="record-body">{body}</p> })}
            {file.map(|(name, url, size)| {
                view! {
                    <a class="record-file" href=url target="_blank" rel="noopener">
                        "📎 "
                        {name}
                        {size.map(|s| format!(" ({})", format_file_size(s)))}
                    </a>
                }
            })}
        </li>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_date() {
        assert_eq!(short_date("2024-03-05T10:20:00.000Z"), "2024-03-05");
        assert_eq!(short_date("2024-03-05"), "2024-03-05");
        assert_eq!(short_date("ontem"), "ontem");
        assert_eq!(short_date("manhã de sexta"), "manhã de sexta");
    }
}
