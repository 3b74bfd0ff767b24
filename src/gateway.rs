//! reqwest によるバックエンド呼び出し

use crate::error::{RecordsError, Result as CliResult};
use crate::image::ImageFile;
use patient_records_common::{
    Attachment, Endpoint, Error, Exam, FeedPage, PatientApi, PatientProfile, ProfilePatch,
    Report, Result, SearchResult, UploadedImage, UPLOAD_FIELD,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout_seconds: u64) -> CliResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| RecordsError::ApiCall(format!("HTTPクライアントの作成に失敗: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T> {
        let url = endpoint.url(&self.base_url);
        tracing::debug!(method = endpoint.method().as_str(), %url, "request");
        let response = self
            .client
            .get(&url)
            .query(&endpoint.query())
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await
    }
}

fn network_error(e: reqwest::Error) -> Error {
    tracing::warn!(error = %e, "request failed");
    Error::Network(e.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "unexpected status");
    Err(Error::Http {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let response = check_status(response).await?;
    let text = response.text().await.map_err(network_error)?;
    Ok(serde_json::from_str(&text)?)
}

impl PatientApi for HttpGateway {
    type Image = ImageFile;

    async fn list_patients(&self, offset: u32) -> Result<FeedPage> {
        self.get_json(Endpoint::PatientPages { offset }).await
    }

    async fn search_by_name(&self, search: &str) -> Result<Vec<SearchResult>> {
        self.get_json(Endpoint::SearchByName { search }).await
    }

    async fn get_profile(&self, id: &str) -> Result<PatientProfile> {
        self.get_json(Endpoint::Patient { id }).await
    }

    async fn patch_profile(&self, id: &str, patch: &ProfilePatch) -> Result<()> {
        let endpoint = Endpoint::PatchPatient { id };
        let url = endpoint.url(&self.base_url);
        tracing::debug!(method = endpoint.method().as_str(), %url, "request");
        let response = self
            .client
            .patch(&url)
            .json(patch)
            .send()
            .await
            .map_err(network_error)?;
        check_status(response).await?;
        Ok(())
    }

    async fn upload_image(&self, image: &ImageFile) -> Result<UploadedImage> {
        let endpoint = Endpoint::UploadImage;
        let url = endpoint.url(&self.base_url);
        tracing::debug!(
            method = endpoint.method().as_str(),
            %url,
            file = %image.file_name,
            "upload"
        );
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)
            .map_err(|e| Error::InvalidImage(e.to_string()))?;
        let form = Form::new().part(UPLOAD_FIELD, part);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(network_error)?;
        read_json(response).await
    }

    async fn list_files(&self, patient_id: &str) -> Result<Vec<Attachment>> {
        self.get_json(Endpoint::Files { patient_id }).await
    }

    async fn list_exams(&self, patient_id: &str) -> Result<Vec<Exam>> {
        self.get_json(Endpoint::Exams { patient_id }).await
    }

    async fn list_reports(&self, patient_id: &str) -> Result<Vec<Report>> {
        self.get_json(Endpoint::Reports { patient_id }).await
    }
}
