use crate::config::settings::{FileConfig, ResolverConfig};
use crate::domain::model::Detection;
use crate::utils::error::{Result, VisionError};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "waste-vision")]
#[command(about = "Resolve which disposal bin detected waste materials belong in")]
pub struct CliConfig {
    /// City whose disposal policy applies
    #[arg(long)]
    pub city: String,

    /// Resolve a single material instead of a detections file
    #[arg(long)]
    pub material: Option<String>,

    /// JSON file with detections exported by the vision model
    #[arg(long)]
    pub detections: Option<String>,

    /// Optional TOML config file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 合併順序：旗標 > TOML 檔 > 環境變數 > 預設值
    pub fn resolver_config(&self) -> Result<ResolverConfig> {
        let mut config = ResolverConfig::from_env();

        if let Some(path) = &self.config {
            FileConfig::from_file(path)?.apply_to(&mut config);
        }

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("city", &self.city)?;

        if self.material.is_none() && self.detections.is_none() {
            return Err(VisionError::MissingConfigError {
                field: "material or detections".to_string(),
            });
        }

        Ok(())
    }
}

/// 讀取模型匯出的偵測結果（JSON 陣列：label + confidence）
pub fn load_detections(path: &Path) -> Result<Vec<Detection>> {
    let content = std::fs::read_to_string(path)?;
    let detections: Vec<Detection> = serde_json::from_str(&content)?;
    Ok(detections)
}
