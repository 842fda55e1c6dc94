use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 12;
pub const DEFAULT_WEIGHTS: &str = "weights/best.pt";

/// Read-only policy-resolver configuration, built once at startup and passed
/// in explicitly (no hidden globals), so test doubles can carry different
/// configurations in the same process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ResolverConfig {
    /// 從環境變數讀取設定，缺的欄位用預設值
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        if let Ok(endpoint) = std::env::var("GEMINI_ENDPOINT") {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        if let Ok(timeout) = std::env::var("GEMINI_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.timeout_secs = secs;
            }
        }

        config
    }
}

impl ConfigProvider for ResolverConfig {
    fn credential(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl Validate for ResolverConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("resolver.endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("resolver.model", &self.model)?;
        validation::validate_range("resolver.timeout_secs", self.timeout_secs, 1, 300)?;
        Ok(())
    }
}

/// Detection-adapter settings (weights location, confidence cutoff).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorSettings {
    #[serde(default = "default_weights")]
    pub weights: String,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

fn default_weights() -> String {
    DEFAULT_WEIGHTS.to_string()
}

fn default_confidence_threshold() -> f32 {
    crate::core::detector::DEFAULT_CONFIDENCE_THRESHOLD
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            weights: default_weights(),
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl Validate for DetectorSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("detector.weights", &self.weights)?;
        validation::validate_range(
            "detector.confidence_threshold",
            self.confidence_threshold,
            0.0,
            1.0,
        )?;
        Ok(())
    }
}

/// TOML 檔案設定（欄位皆可省略）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub resolver: Option<ResolverSection>,
    pub detector: Option<DetectorSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSection {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed = substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Overlays the file's resolver section onto an existing config.
    pub fn apply_to(&self, config: &mut ResolverConfig) {
        if let Some(resolver) = &self.resolver {
            if let Some(endpoint) = &resolver.endpoint {
                config.endpoint = endpoint.clone();
            }
            if let Some(model) = &resolver.model {
                config.model = model.clone();
            }
            if let Some(timeout_secs) = resolver.timeout_secs {
                config.timeout_secs = timeout_secs;
            }
        }
    }

    pub fn detector_settings(&self) -> DetectorSettings {
        self.detector.clone().unwrap_or_default()
    }
}

/// 替換 ${VAR_NAME} 形式的環境變數，未定義的保留原樣
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}
