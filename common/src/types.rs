//! APIの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - PatientSummary: フィード一覧の1件
//! - PatientProfile: 編集モーダルで扱う患者データ
//! - SearchResult: 名前検索の1件
//! - Attachment / Exam / Report / Hospitalization: 患者に紐づく記録

use serde::{Deserialize, Deserializer, Serialize};

/// 一覧カードに表示する検査ラベル（サーバーからは返らない固定値）
pub const DEFAULT_EXAM_LABELS: &[&str] = &["Hemograma"];

/// 診断タグ（ユーザーが自由に追加できる）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisOption {
    pub label: String,
    pub value: String,
}

impl DiagnosisOption {
    /// 入力文字列からタグを作る（label と value は同じ）
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        Self { value: label.clone(), label }
    }
}

/// フィードの患者カード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientSummary {
    pub id: String,
    pub profile_photo: Option<String>,
    pub name: String,
    pub specie: String,
    pub race: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub weight: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub prognosis: String,
    pub diagnosis: Vec<DiagnosisOption>,
    #[serde(deserialize_with = "null_as_empty")]
    pub physical_shape: String,
}

impl PatientSummary {
    /// カードに並べる検査ラベル
    pub fn exam_labels(&self) -> &'static [&'static str] {
        DEFAULT_EXAM_LABELS
    }
}

/// ページ情報
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1ページの件数
    pub size: u32,
    /// 全件数
    pub length: u32,
}

/// `GET /patient/pages` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub results: Vec<PatientSummary>,
    pub info: PageInfo,
}

/// 名前検索の1件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub specie: Option<String>,
    pub race: Option<String>,
    pub profile_photo: Option<String>,
}

impl SearchResult {
    /// 種・品種の補助行（空のものは出さない）
    pub fn subtitle_lines(&self) -> Vec<&str> {
        [self.specie.as_deref(), self.race.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// `GET /patient/{id}` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientProfile {
    pub id: String,
    pub name: String,
    pub specie: String,
    pub race: String,
    pub gender: Option<String>,
    pub weight: String,
    pub prognosis: Option<String>,
    pub physical_shape: Option<String>,
    pub diagnosis: Vec<DiagnosisOption>,
    pub profile_photo: Option<String>,
    pub entry_date: String,
    pub departure_date: String,
    pub owner: String,
    pub undefined_specie: bool,
    pub undefined_race: bool,
    pub ownerless_patient: bool,
}

/// `POST /uploads/image/` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub image_url: String,
}

/// 記録に添付されたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef<'a> {
    pub filename: &'a str,
    pub url: &'a str,
    pub size: Option<u64>,
}

/// 添付ファイル（`GET /files/{patientId}/files`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub patient_id: String,
    pub filename: String,
    pub file_url: String,
    #[serde(deserialize_with = "lenient_size")]
    pub file_size: Option<u64>,
    pub created_at: String,
}

/// 検査（`GET /exams/{patientId}/exams`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub patient_id: String,
    pub date: String,
    pub author: String,
    #[serde(rename = "type_of_exam")]
    pub type_of_exam: String,
    pub annotations: String,
    pub filename: Option<String>,
    pub file_url: Option<String>,
    #[serde(deserialize_with = "lenient_size")]
    pub file_size: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

/// 経過報告（`GET /reports/{patientId}/reports`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub patient_id: String,
    pub shift: String,
    pub author: String,
    pub title: String,
    #[serde(rename = "report_text")]
    pub report_text: String,
    pub filename: Option<String>,
    pub file_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// 入院記録
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hospitalization {
    pub id: String,
    pub patient_id: String,
    pub author: String,
    pub entry_date: String,
    pub departure_date: String,
    pub annotations: String,
    pub created_at: String,
}

impl Attachment {
    pub fn file(&self) -> Option<FileRef<'_>> {
        file_ref(Some(&self.filename), Some(&self.file_url), self.file_size)
    }
}

impl Exam {
    pub fn file(&self) -> Option<FileRef<'_>> {
        file_ref(self.filename.as_ref(), self.file_url.as_ref(), self.file_size)
    }
}

impl Report {
    pub fn file(&self) -> Option<FileRef<'_>> {
        file_ref(self.filename.as_ref(), self.file_url.as_ref(), None)
    }
}

fn file_ref<'a>(
    filename: Option<&'a String>,
    url: Option<&'a String>,
    size: Option<u64>,
) -> Option<FileRef<'a>> {
    match (filename, url) {
        (Some(filename), Some(url)) if !url.is_empty() => Some(FileRef {
            filename: filename.as_str(),
            url: url.as_str(),
            size,
        }),
        _ => None,
    }
}

/// 未入力の項目は null で来る
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// fileSize は数値でも文字列でも来る
fn lenient_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// ファイルサイズの表示（KB/MB）
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_page_deserialize() {
        let json = r#"{
            "results": [
                {"id": "p1", "name": "Rex", "specie": "Canino", "race": "SRD",
                 "diagnosis": [{"label": "Erliquiose", "value": "Erliquiose"}]}
            ],
            "info": {"size": 20, "length": 57}
        }"#;
        let page: FeedPage = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].diagnosis[0].label, "Erliquiose");
        assert_eq!(page.results[0].profile_photo, None);
        assert_eq!(page.info, PageInfo { size: 20, length: 57 });
    }

    #[test]
    fn test_summary_null_fields_become_empty() {
        let json = r#"{"id": "p2", "name": "Mia", "gender": null, "prognosis": null}"#;
        let card: PatientSummary = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(card.gender, "");
        assert_eq!(card.prognosis, "");
        assert_eq!(card.physical_shape, "");
    }

    #[test]
    fn test_profile_defaults_for_missing_flags() {
        let json = r#"{"id": "p1", "name": "Mia", "owner": "Ana"}"#;
        let profile: PatientProfile = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert!(!profile.undefined_specie);
        assert!(!profile.ownerless_patient);
        assert_eq!(profile.owner, "Ana");
    }

    #[test]
    fn test_exam_mixed_case_fields() {
        let json = r#"{
            "id": "e1", "patientId": "p1", "type_of_exam": "Raio-X",
            "fileUrl": "https://cdn/x.pdf", "filename": "x.pdf", "fileSize": "2048",
            "createdAt": "2024-03-01T10:00:00Z"
        }"#;
        let exam: Exam = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(exam.patient_id, "p1");
        assert_eq!(exam.type_of_exam, "Raio-X");
        let file = exam.file().expect("ファイル参照がない");
        assert_eq!(file.size, Some(2048));
        assert_eq!(file.url, "https://cdn/x.pdf");
    }

    #[test]
    fn test_report_without_file() {
        let json = r#"{"id": "r1", "title": "Plantão", "report_text": "Estável"}"#;
        let report: Report = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(report.report_text, "Estável");
        assert!(report.file().is_none());
    }

    #[test]
    fn test_upload_response() {
        let uploaded: UploadedImage =
            serde_json::from_str(r#"{"imageUrl": "https://cdn/a.png"}"#).expect("デシリアライズ失敗");
        assert_eq!(uploaded.image_url, "https://cdn/a.png");
    }

    #[test]
    fn test_search_result_subtitle() {
        let result = SearchResult {
            id: "1".into(),
            name: "Tom".into(),
            specie: Some("Felino".into()),
            race: Some("  ".into()),
            profile_photo: None,
        };
        assert_eq!(result.subtitle_lines(), vec!["Felino"]);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.0 MB");
    }
}
