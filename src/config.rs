use crate::error::{RecordsError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIのURLを上書きする環境変数
pub const API_URL_ENV: &str = "PATIENT_RECORDS_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: Option<String>,
    pub timeout_seconds: u64,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_seconds: 30,
            log_filter: "warn".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RecordsError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("patient-records").join("config.json"))
    }

    /// 使うURLを決める（引数 > 環境変数 > 設定ファイル）
    pub fn api_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env = std::env::var(API_URL_ENV).ok();
        self.resolve_api_url(cli_override, env.as_deref())
    }

    pub fn resolve_api_url(&self, cli_override: Option<&str>, env: Option<&str>) -> Result<String> {
        [cli_override, env, self.api_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or(RecordsError::MissingApiUrl)
    }

    pub fn set_api_url(&mut self, url: String) -> Result<()> {
        let url = url.trim().to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RecordsError::Config(format!(
                "URLは http:// か https:// で始めてください: {}",
                url
            )));
        }
        self.api_url = Some(url);
        Ok(())
    }
}
