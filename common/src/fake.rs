//! テスト用のメモリ上ゲートウェイ
//!
//! 呼び出しを `"search:pa"` のような文字列で記録する。

use crate::api::PatientApi;
use crate::error::{Error, Result};
use crate::profile::ProfilePatch;
use crate::types::{
    Attachment, Exam, FeedPage, PatientProfile, Report, SearchResult, UploadedImage,
};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FakeApi {
    pages: HashMap<u32, FeedPage>,
    search: Vec<SearchResult>,
    profile: Option<PatientProfile>,
    files: Vec<Attachment>,
    exams: Vec<Exam>,
    reports: Vec<Report>,
    upload_url: String,
    fail_upload: bool,
    calls: RefCell<Vec<String>>,
    patches: RefCell<Vec<(String, ProfilePatch)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            upload_url: "https://cdn.test/upload.png".to_string(),
            ..Default::default()
        }
    }

    pub fn with_page(mut self, offset: u32, page: FeedPage) -> Self {
        self.pages.insert(offset, page);
        self
    }

    pub fn with_search(mut self, results: Vec<SearchResult>) -> Self {
        self.search = results;
        self
    }

    pub fn with_profile(mut self, profile: PatientProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_files(mut self, files: Vec<Attachment>) -> Self {
        self.files = files;
        self
    }

    pub fn with_exams(mut self, exams: Vec<Exam>) -> Self {
        self.exams = exams;
        self
    }

    pub fn with_upload_url(mut self, url: &str) -> Self {
        self.upload_url = url.to_string();
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn patches(&self) -> Vec<(String, ProfilePatch)> {
        self.patches.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn not_found() -> Error {
    Error::Http {
        status: 404,
        body: "not found".to_string(),
    }
}

impl PatientApi for FakeApi {
    type Image = String;

    async fn list_patients(&self, offset: u32) -> Result<FeedPage> {
        self.record(format!("pages:{}", offset));
        self.pages.get(&offset).cloned().ok_or_else(not_found)
    }

    async fn search_by_name(&self, search: &str) -> Result<Vec<SearchResult>> {
        self.record(format!("search:{}", search));
        Ok(self.search.clone())
    }

    async fn get_profile(&self, id: &str) -> Result<PatientProfile> {
        self.record(format!("profile:{}", id));
        self.profile.clone().ok_or_else(not_found)
    }

    async fn patch_profile(&self, id: &str, patch: &ProfilePatch) -> Result<()> {
        self.record(format!("patch:{}", id));
        self.patches.borrow_mut().push((id.to_string(), patch.clone()));
        Ok(())
    }

    async fn upload_image(&self, image: &String) -> Result<UploadedImage> {
        self.record(format!("upload:{}", image));
        if self.fail_upload {
            return Err(Error::Http {
                status: 413,
                body: "payload too large".to_string(),
            });
        }
        Ok(UploadedImage {
            image_url: self.upload_url.clone(),
        })
    }

    async fn list_files(&self, patient_id: &str) -> Result<Vec<Attachment>> {
        self.record(format!("files:{}", patient_id));
        Ok(self.files.clone())
    }

    async fn list_exams(&self, patient_id: &str) -> Result<Vec<Exam>> {
        self.record(format!("exams:{}", patient_id));
        Ok(self.exams.clone())
    }

    async fn list_reports(&self, patient_id: &str) -> Result<Vec<Report>> {
        self.record(format!("reports:{}", patient_id));
        Ok(self.reports.clone())
    }
}
