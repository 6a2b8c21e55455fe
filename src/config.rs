use crate::error::{OcrUploadError, Result};
use ocr_upload_common::{ExportFormat, ResponseOrdering};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "OCR_UPLOAD_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub export_format: ExportFormat,
    pub response_ordering: ResponseOrdering,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            export_format: ExportFormat::default(),
            response_ordering: ResponseOrdering::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OcrUploadError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ocr-upload").join("config.json"))
    }

    /// 実際に使うベースURL
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル
    pub fn resolve_base_url(&self, flag: Option<&str>) -> Result<String> {
        let env = std::env::var(BASE_URL_ENV).ok();
        let url = flag
            .map(str::to_string)
            .or(env)
            .unwrap_or_else(|| self.base_url.clone());

        if url.trim().is_empty() {
            return Err(OcrUploadError::MissingBaseUrl);
        }
        Ok(url.trim().to_string())
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(OcrUploadError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.base_url = url;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.export_format, ExportFormat::Doc);
        assert_eq!(config.response_ordering, ResponseOrdering::LatestSubmission);
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"export_format": "txt"}"#).unwrap();
        assert_eq!(config.export_format, ExportFormat::Txt);
        assert_eq!(config.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config {
            base_url: "https://ocr.example.com".into(),
            export_format: ExportFormat::WordXml,
            response_ordering: ResponseOrdering::LastResponse,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("word-xml"));
        assert!(json.contains("last-response"));

        let loaded: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.base_url, config.base_url);
        assert_eq!(loaded.response_ordering, ResponseOrdering::LastResponse);
    }

    #[test]
    fn test_flag_overrides_config() {
        let config = Config::default();
        let url = config.resolve_base_url(Some(" http://127.0.0.1:9000 ")).unwrap();
        assert_eq!(url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_empty_flag_is_rejected() {
        let config = Config::default();
        let result = config.resolve_base_url(Some("   "));
        assert!(matches!(result, Err(OcrUploadError::MissingBaseUrl)));
    }
}
