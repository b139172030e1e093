use crate::adapters::http::DEFAULT_SOURCE_URL;
use crate::core::postal_codes::DEFAULT_MAX_SUGGESTIONS;
use crate::utils::error::{QrBillError, Result};
use crate::utils::validation::{
    validate_directory, validate_min, validate_one_of, validate_range, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

static ENV_VAR_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub postal_codes: PostalCodesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalCodesConfig {
    pub source_url: String,
    pub cache_dir: Option<String>,
    pub timeout_seconds: u64,
    pub max_suggestions: usize,
}

impl Default for PostalCodesConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_dir: None,
            timeout_seconds: 30,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QrBillError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| QrBillError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${QRBILL_CACHE_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.postal_codes.timeout_seconds)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("postal_codes.source_url", &self.postal_codes.source_url)?;

        if let Some(cache_dir) = &self.postal_codes.cache_dir {
            validate_directory("postal_codes.cache_dir", cache_dir)?;
        }

        validate_range("postal_codes.timeout_seconds", self.postal_codes.timeout_seconds, 1, 600)?;
        validate_min("postal_codes.max_suggestions", self.postal_codes.max_suggestions, 1)?;
        validate_one_of("logging.level", &self.logging.level, LOG_LEVELS)?;

        Ok(())
    }
}
