use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIのURLが設定されていません。`patient-records config --set-api-url URL` で設定してください")]
    MissingApiUrl,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("入力エラー: {0}")]
    Validation(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力プロンプトエラー: {0}")]
    Prompt(String),

    #[error(transparent)]
    Common(#[from] patient_records_common::Error),
}

impl From<reqwest::Error> for RecordsError {
    fn from(e: reqwest::Error) -> Self {
        RecordsError::ApiCall(e.to_string())
    }
}

impl From<dialoguer::Error> for RecordsError {
    fn from(e: dialoguer::Error) -> Self {
        RecordsError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RecordsError>;
