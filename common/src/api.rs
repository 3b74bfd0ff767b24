//! バックエンド呼び出しの抽象
//!
//! CLIは reqwest、Webは fetch API (web-sys) で実装する。コントローラはこのトレイトだけに依存する。

use crate::error::Result;
use crate::profile::ProfilePatch;
use crate::types::{
    Attachment, Exam, FeedPage, Hospitalization, PatientProfile, Report, SearchResult,
    UploadedImage,
};

#[allow(async_fn_in_trait)]
pub trait PatientApi {
    /// アップロードする画像の表現（CLIはバイト列、Webは `web_sys::File`）
    type Image;

    async fn list_patients(&self, offset: u32) -> Result<FeedPage>;

    async fn search_by_name(&self, search: &str) -> Result<Vec<SearchResult>>;

    async fn get_profile(&self, id: &str) -> Result<PatientProfile>;

    async fn patch_profile(&self, id: &str, patch: &ProfilePatch) -> Result<()>;

    async fn upload_image(&self, image: &Self::Image) -> Result<UploadedImage>;

    async fn list_files(&self, patient_id: &str) -> Result<Vec<Attachment>>;

    async fn list_exams(&self, patient_id: &str) -> Result<Vec<Exam>>;

    async fn list_reports(&self, patient_id: &str) -> Result<Vec<Report>>;

    /// 入院記録の一覧APIはバックエンドにまだ無いので空で返す
    async fn list_hospitalizations(&self, _patient_id: &str) -> Result<Vec<Hospitalization>> {
        Ok(Vec::new())
    }
}
