//! fetch API によるバックエンド呼び出し
//!
//! ベースURLは `<meta name="api-url" content="...">` から読み、無ければページのオリジンを使う。

use patient_records_common::{
    Attachment, Endpoint, Error, Exam, FeedPage, Method, PatientApi, PatientProfile,
    ProfilePatch, Report, Result, SearchResult, UploadedImage, UPLOAD_FIELD,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebGateway {
    base_url: String,
}

impl WebGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// ページの meta タグからベースURLを決める
    pub fn from_document() -> Self {
        Self::new(meta_api_url().or_else(page_origin).unwrap_or_default())
    }

    /// クエリ付きのURL
    fn url(&self, endpoint: &Endpoint<'_>) -> String {
        let mut url = endpoint.url(&self.base_url);
        let query: Vec<String> = endpoint
            .query()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, String::from(js_sys::encode_uri_component(&v))))
            .collect();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    async fn send(&self, endpoint: Endpoint<'_>, body: Option<Body>) -> Result<Response> {
        let url = self.url(&endpoint);
        let method = endpoint.method();

        let opts = RequestInit::new();
        opts.set_method(method.as_str());
        opts.set_mode(RequestMode::Cors);
        let is_json = matches!(body, Some(Body::Json(_)));
        match body {
            Some(Body::Json(json)) => opts.set_body(&JsValue::from_str(&json)),
            Some(Body::Form(form)) => opts.set_body(&form),
            None => {}
        }

        let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;
        if is_json {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
        }

        let window = web_sys::window().ok_or_else(|| Error::Network("window がありません".into()))?;
        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?;
        let response: Response = value.dyn_into().map_err(js_error)?;

        if !response.ok() {
            let status = response.status();
            let body = response_text(&response).await.unwrap_or_default();
            gloo::console::warn!(format!("{} {} -> {}", method.as_str(), url, status));
            return Err(Error::Http { status, body });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint<'_>) -> Result<T> {
        debug_assert_eq!(endpoint.method(), Method::Get);
        let response = self.send(endpoint, None).await?;
        let text = response_text(&response).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

enum Body {
    Json(String),
    Form(FormData),
}

fn js_error(e: JsValue) -> Error {
    let message = e.as_string().unwrap_or_else(|| format!("{:?}", e));
    gloo::console::error!(message.clone());
    Error::Network(message)
}

async fn response_text(response: &Response) -> Result<String> {
    let promise = response.text().map_err(js_error)?;
    let value = JsFuture::from(promise).await.map_err(js_error)?;
    Ok(value.as_string().unwrap_or_default())
}

fn meta_api_url() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let meta = document.query_selector("meta[name=api-url]").ok()??;
    meta.get_attribute("content").filter(|c| !c.trim().is_empty())
}

fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

impl PatientApi for WebGateway {
    type Image = File;

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
        let json = serde_json::to_string(patch)?;
        self.send(Endpoint::PatchPatient { id }, Some(Body::Json(json)))
            .await?;
        Ok(())
    }

    async fn upload_image(&self, image: &File) -> Result<UploadedImage> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename(UPLOAD_FIELD, image, &image.name())
            .map_err(js_error)?;
        let response = self.send(Endpoint::UploadImage, Some(Body::Form(form))).await?;
        let text = response_text(&response).await?;
        Ok(serde_json::from_str(&text)?)
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

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_search_url_is_encoded() {
        let gateway = WebGateway::new("https://vet.example/");
        let url = gateway.url(&Endpoint::SearchByName { search: "São Rex" });
        assert_eq!(url, "https://vet.example/patient/search/by/name?search=S%C3%A3o%20Rex");
    }

    #[wasm_bindgen_test]
    fn test_page_url() {
        let gateway = WebGateway::new("https://vet.example");
        let url = gateway.url(&Endpoint::PatientPages { offset: 40 });
        assert_eq!(url, "https://vet.example/patient/pages?offset=40");
        let url = gateway.url(&Endpoint::Exams { patient_id: "p1" });
        assert_eq!(url, "https://vet.example/exams/p1/exams");
    }
}
