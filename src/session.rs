//! サブコマンドの処理本体
//!
//! ゲートウェイは `PatientApi` で受け取るので、テストでは偽物を差し込める。

use crate::error::{RecordsError, Result};
use crate::render;
use patient_records_common::{
    fetch_search, load_page, DiagnosisKey, Error, FeedController, PatientApi, ProfileEditor,
    ProfileField, ProfilePatch, QueryCache, RecordTab, RecordViewer, SearchController,
};

/// 検索して表示用の文字列を返す
pub async fn run_search<A: PatientApi>(
    api: &A,
    cache: &QueryCache,
    text: &str,
    all: bool,
) -> Result<String> {
    let mut search = SearchController::new();
    search.focus();
    if let Some(request) = search.set_text(text) {
        let result = fetch_search(api, cache, &request.query).await;
        search.resolve(request.ticket, result);
    }
    let view = if all {
        search.dialog_view()
    } else {
        search.compact_view()
    };
    Ok(render::render_search(&view))
}

/// 一覧を1ページ取得する
///
/// ページ番号指定のときは1ページ目でページサイズを知ってから移動する。
pub async fn run_list<A: PatientApi>(
    api: &A,
    page: Option<u32>,
    offset: Option<u32>,
) -> Result<String> {
    let mut feed = FeedController::new();
    let request = feed.set_offset(offset.unwrap_or(0)).unwrap_or_else(|| feed.start());
    load_page(api, &mut feed, request).await;

    if let Some(page) = page.filter(|p| *p > 1) {
        if let Some(request) = feed.jump_to_page(page) {
            load_page(api, &mut feed, request).await;
        }
    }

    if let Some(message) = feed.error() {
        if feed.cards().is_empty() {
            return Err(RecordsError::ApiCall(message.to_string()));
        }
        tracing::warn!(message, "showing previous page");
    }
    Ok(render::render_feed(feed.cards(), feed.pagination()))
}

/// 記録ビューアを開いて全タブを読み込む
pub async fn open_viewer<A>(api: &A, id: &str) -> RecordViewer<A::Image>
where
    A: PatientApi,
    A::Image: Clone,
{
    let mut viewer = RecordViewer::new(id);
    viewer.load_all(api).await;
    viewer
}

/// タブを表示する（未指定なら全タブ）
pub fn render_viewer<I>(viewer: &RecordViewer<I>, tab: Option<RecordTab>) -> String {
    let tabs: Vec<RecordTab> = match tab {
        Some(tab) => vec![tab],
        None => RecordTab::ALL.to_vec(),
    };
    tabs.into_iter()
        .map(|tab| render::render_tab(viewer, tab))
        .collect::<Vec<_>>()
        .join("\n")
}

/// コマンドラインで指定された編集内容
#[derive(Debug, Clone, Default)]
pub struct ProfileEdits {
    pub fields: Vec<(ProfileField, String)>,
    pub undefined_specie: Option<bool>,
    pub undefined_race: Option<bool>,
    pub ownerless_patient: Option<bool>,
    pub add_diagnosis: Vec<String>,
    pub clear_diagnosis: bool,
}

impl ProfileEdits {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
            && self.undefined_specie.is_none()
            && self.undefined_race.is_none()
            && self.ownerless_patient.is_none()
            && self.add_diagnosis.is_empty()
            && !self.clear_diagnosis
    }
}

/// 編集ダイアログを開く（プロフィール取得）
pub async fn open_editor<A>(api: &A, id: &str) -> Result<ProfileEditor<A::Image>>
where
    A: PatientApi,
    A::Image: Clone,
{
    let mut editor = ProfileEditor::new(id);
    editor.load(api).await;
    if let Some(message) = editor.load_error() {
        return Err(RecordsError::ApiCall(message.to_string()));
    }
    Ok(editor)
}

pub fn apply_edits<I>(editor: &mut ProfileEditor<I>, edits: &ProfileEdits) -> Result<()> {
    for (field, value) in &edits.fields {
        editor.form_mut().set(*field, value).map_err(records_error)?;
    }
    let form = editor.form_mut();
    if let Some(flag) = edits.undefined_specie {
        form.undefined_specie = flag;
    }
    if let Some(flag) = edits.undefined_race {
        form.undefined_race = flag;
    }
    if let Some(flag) = edits.ownerless_patient {
        form.ownerless_patient = flag;
    }
    if edits.clear_diagnosis {
        editor.set_diagnosis(Vec::new());
    }
    for label in &edits.add_diagnosis {
        editor.set_diagnosis_input(label.trim());
        editor.handle_diagnosis_key(DiagnosisKey::Enter);
    }
    Ok(())
}

/// 保存する
pub async fn save_profile<A>(
    api: &A,
    cache: &QueryCache,
    editor: &mut ProfileEditor<A::Image>,
) -> Result<ProfilePatch>
where
    A: PatientApi,
    A::Image: Clone,
{
    editor.submit(api, cache).await.map_err(records_error)
}

/// 入力エラーは項目ごとのメッセージにまとめる
fn records_error(e: Error) -> RecordsError {
    match e {
        Error::Validation(errors) => RecordsError::Validation(errors.to_string()),
        other => RecordsError::Common(other),
    }
}
