//! 端末向けの表示
//!
//! コントローラの状態を文字列にするだけで、入出力はしない。

use chrono::{DateTime, NaiveDate};
use patient_records_common::{
    format_file_size, FileRef, Pagination, PatientSummary, ProfileEditor, ProfileField,
    RecordTab, RecordViewer, SearchView, TabView, NO_RESULTS_MESSAGE,
};
use std::fmt::Write;

const PAGE_BUTTONS: u32 = 5;

/// 日付を `YYYY/MM/DD` にする（読めなければそのまま）
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y/%m/%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y/%m/%d").to_string();
    }
    raw.to_string()
}

pub fn render_search(view: &SearchView<'_>) -> String {
    let mut out = String::new();
    match view {
        SearchView::Hidden => {}
        SearchView::Loading => out.push_str("検索中...\n"),
        SearchView::Empty => {
            let _ = writeln!(out, "{}", NO_RESULTS_MESSAGE);
        }
        SearchView::Failed(message) => {
            let _ = writeln!(out, "✗ {}", message);
        }
        SearchView::Rows { rows, show_all } => {
            for row in rows {
                let subtitle = row.result.subtitle_lines().join(" / ");
                let _ = write!(out, "  {}  [{}]", row.result.name, row.result.id);
                if !subtitle.is_empty() {
                    let _ = write!(out, "  {}", subtitle);
                }
                out.push('\n');
                if !row.is_last {
                    out.push_str("  ----------------------------------------\n");
                }
            }
            if *show_all {
                out.push_str("  → すべての結果を見る: --all\n");
            }
        }
    }
    out
}

pub fn render_card(card: &PatientSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "■ {}  [{}]", card.name, card.id);
    let _ = writeln!(
        out,
        "  {} / {} / {} / {}",
        or_dash(&card.specie),
        or_dash(&card.race),
        or_dash(&card.gender),
        or_dash(&card.weight)
    );
    if !card.prognosis.is_empty() {
        let _ = writeln!(out, "  予後: {}", card.prognosis);
    }
    if !card.diagnosis.is_empty() {
        let labels: Vec<&str> = card.diagnosis.iter().map(|d| d.label.as_str()).collect();
        let _ = writeln!(out, "  診断: {}", labels.join(", "));
    }
    let _ = writeln!(out, "  検査: {}", card.exam_labels().join(", "));
    out
}

pub fn render_feed(cards: &[PatientSummary], pagination: Option<Pagination>) -> String {
    let mut out = String::new();
    if cards.is_empty() {
        out.push_str("患者が登録されていません\n");
    }
    for card in cards {
        out.push_str(&render_card(card));
        out.push('\n');
    }
    if let Some(p) = pagination {
        out.push_str(&render_pagination(&p));
    }
    out
}

/// `‹ 1 [2] 3 ›  (2/3ページ, 全57件)`
pub fn render_pagination(p: &Pagination) -> String {
    let pages: Vec<String> = p
        .visible_pages(PAGE_BUTTONS)
        .into_iter()
        .map(|n| {
            if n == p.current_page() {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        })
        .collect();
    format!(
        "{} {} {}  ({}/{}ページ, 全{}件)\n",
        if p.has_previous() { "‹" } else { " " },
        pages.join(" "),
        if p.has_next() { "›" } else { " " },
        p.current_page(),
        p.total_pages(),
        p.total
    )
}

pub fn render_profile<I>(editor: &ProfileEditor<I>) -> String {
    let mut out = String::new();
    let form = editor.form();
    if let Some(photo) = editor.photo() {
        let _ = writeln!(out, "写真: {}", photo);
    }
    for field in ProfileField::ALL {
        let value = form.value(field);
        let value = match field {
            ProfileField::EntryDate | ProfileField::DepartureDate => format_date(value),
            _ => value.to_string(),
        };
        let suffix = if form.is_overridden(field) { " (不明)" } else { "" };
        let _ = writeln!(out, "{}: {}{}", field.label(), or_dash(&value), suffix);
        if let Some(error) = editor.visible_error(field) {
            let _ = writeln!(out, "  ✗ {}", error);
        }
    }
    let labels: Vec<&str> = form.diagnosis.iter().map(|d| d.label.as_str()).collect();
    let diagnosis = if labels.is_empty() {
        "-".to_string()
    } else {
        labels.join(", ")
    };
    let _ = writeln!(out, "診断: {}", diagnosis);
    out
}

/// タブ1つ分
pub fn render_tab<I>(viewer: &RecordViewer<I>, tab: RecordTab) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", tab.label());
    match viewer.tab_view(tab) {
        TabView::Closed => {}
        TabView::Loading => out.push_str("読み込み中...\n"),
        TabView::Failed => {
            let _ = writeln!(out, "✗ {}", viewer.tab_error(tab).unwrap_or("取得に失敗しました"));
        }
        TabView::Empty => {
            out.push_str("登録がありません\n");
            if let Some(label) = tab.register_label() {
                let _ = writeln!(out, "  [+ {}]", label);
            }
        }
        TabView::Items(_) => match tab {
            RecordTab::Profile => out.push_str(&render_profile(viewer.editor())),
            RecordTab::Attachments => {
                for file in viewer.files() {
                    let _ = writeln!(out, "- {}  {}", file.filename, format_date(&file.created_at));
                    push_file(&mut out, file.file());
                }
            }
            RecordTab::Exams => {
                for exam in viewer.exams() {
                    let _ = writeln!(
                        out,
                        "- {}  {}  {}",
                        format_date(&exam.date),
                        exam.type_of_exam,
                        exam.author
                    );
                    if !exam.annotations.is_empty() {
                        let _ = writeln!(out, "  {}", exam.annotations);
                    }
                    push_file(&mut out, exam.file());
                }
            }
            RecordTab::Hospitalizations => {
                for stay in viewer.hospitalizations() {
                    let _ = writeln!(
                        out,
                        "- {} 〜 {}  {}",
                        format_date(&stay.entry_date),
                        format_date(&stay.departure_date),
                        stay.author
                    );
                    if !stay.annotations.is_empty() {
                        let _ = writeln!(out, "  {}", stay.annotations);
                    }
                }
            }
            RecordTab::Reports => {
                for report in viewer.reports() {
                    let _ = writeln!(
                        out,
                        "- {}  [{}]  {}  {}",
                        report.title,
                        report.shift,
                        report.author,
                        format_date(&report.created_at)
                    );
                    if !report.report_text.is_empty() {
                        let _ = writeln!(out, "  {}", report.report_text);
                    }
                    push_file(&mut out, report.file());
                }
            }
        },
    }
    out
}

fn push_file(out: &mut String, file: Option<FileRef<'_>>) {
    if let Some(file) = file {
        let size = file.size.map(format_file_size).unwrap_or_default();
        let _ = writeln!(out, "  📎 {} {} {}", file.filename, size, file.url);
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
