//! エラー型定義

use crate::profile::ValidationErrors;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),
}

impl Error {
    /// 画面のエラーバナーに出す短いメッセージ
    pub fn banner_message(&self) -> String {
        match self {
            Error::Http { status, .. } if *status == 404 => "対象のデータが見つかりません".to_string(),
            Error::Http { status, .. } if *status >= 500 => {
                format!("サーバーエラーが発生しました ({})", status)
            }
            Error::Network(_) => "サーバーに接続できませんでした".to_string(),
            Error::Validation(_) => "入力内容を確認してください".to_string(),
            other => format!("処理に失敗しました: {}", other),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_http() {
        let error = Error::Http { status: 422, body: "bad field".to_string() };
        assert_eq!(format!("{}", error), "HTTP error 422: bad field");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_banner_message() {
        let not_found = Error::Http { status: 404, body: String::new() };
        assert_eq!(not_found.banner_message(), "対象のデータが見つかりません");

        let server = Error::Http { status: 503, body: String::new() };
        assert!(server.banner_message().contains("503"));

        let network = Error::Network("connection refused".to_string());
        assert_eq!(network.banner_message(), "サーバーに接続できませんでした");
    }
}
