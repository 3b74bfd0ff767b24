//! バックエンドのエンドポイント一覧
//!
//! パスとクエリだけを組み立て、送信はゲートウェイ側（reqwest / web-sys の fetch）が行う。

/// HTTPメソッド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

/// 呼び出し先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint<'a> {
    PatientPages { offset: u32 },
    SearchByName { search: &'a str },
    Patient { id: &'a str },
    PatchPatient { id: &'a str },
    UploadImage,
    Files { patient_id: &'a str },
    Exams { patient_id: &'a str },
    Reports { patient_id: &'a str },
}

/// multipartアップロードのフィールド名
pub const UPLOAD_FIELD: &str = "image";

impl Endpoint<'_> {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::PatchPatient { .. } => Method::Patch,
            Endpoint::UploadImage => Method::Post,
            _ => Method::Get,
        }
    }

    /// ベースURLからの相対パス
    pub fn path(&self) -> String {
        match self {
            Endpoint::PatientPages { .. } => "/patient/pages".to_string(),
            Endpoint::SearchByName { .. } => "/patient/search/by/name".to_string(),
            Endpoint::Patient { id } | Endpoint::PatchPatient { id } => format!("/patient/{}", id),
            Endpoint::UploadImage => "/uploads/image/".to_string(),
            Endpoint::Files { patient_id } => format!("/files/{}/files", patient_id),
            Endpoint::Exams { patient_id } => format!("/exams/{}/exams", patient_id),
            Endpoint::Reports { patient_id } => format!("/reports/{}/reports", patient_id),
        }
    }

    /// クエリパラメータ（エンコード前）
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::PatientPages { offset } => vec![("offset", offset.to_string())],
            Endpoint::SearchByName { search } => vec![("search", search.to_string())],
            _ => Vec::new(),
        }
    }

    /// ベースURLと結合したURL（クエリなし）
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::PatientPages { offset: 20 }.path(), "/patient/pages");
        assert_eq!(Endpoint::Patient { id: "abc" }.path(), "/patient/abc");
        assert_eq!(Endpoint::Files { patient_id: "p1" }.path(), "/files/p1/files");
        assert_eq!(Endpoint::Exams { patient_id: "p1" }.path(), "/exams/p1/exams");
        assert_eq!(Endpoint::Reports { patient_id: "p1" }.path(), "/reports/p1/reports");
        assert_eq!(Endpoint::UploadImage.path(), "/uploads/image/");
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::PatchPatient { id: "x" }.method(), Method::Patch);
        assert_eq!(Endpoint::UploadImage.method(), Method::Post);
        assert_eq!(Endpoint::SearchByName { search: "a" }.method(), Method::Get);
    }

    #[test]
    fn test_query() {
        assert_eq!(
            Endpoint::PatientPages { offset: 40 }.query(),
            vec![("offset", "40".to_string())]
        );
        assert_eq!(
            Endpoint::SearchByName { search: "Rex Silva" }.query(),
            vec![("search", "Rex Silva".to_string())]
        );
        assert!(Endpoint::Patient { id: "1" }.query().is_empty());
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let url = Endpoint::Patient { id: "7" }.url("http://localhost:3333/");
        assert_eq!(url, "http://localhost:3333/patient/7");
    }
}
