use crate::domain::model::{Detection, PolicyQuery, PolicyResult, RawDetection};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// 底層物件偵測模型（外部協作者）
///
/// Instances below `confidence_threshold` are filtered out by the model
/// itself, matching the upstream predict contract.
pub trait VisionModel: Send + Sync {
    fn predict(&self, image: &Path, confidence_threshold: f32) -> Result<Vec<RawDetection>>;
}

/// Turns one image into a normalized detection sequence.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image: &Path) -> Result<Vec<Detection>>;
}

/// Resolves a (city, material) pair into a disposal recommendation.
///
/// Deliberately infallible: every failure mode collapses into a fallback
/// `PolicyResult`, so callers never need a separate error channel.
#[async_trait]
pub trait PolicyAdvisor: Send + Sync {
    async fn resolve(&self, query: &PolicyQuery) -> PolicyResult;
}

/// Read-only resolver configuration, established once at process start.
pub trait ConfigProvider: Send + Sync {
    fn credential(&self) -> Option<&str>;
    fn endpoint(&self) -> &str;
    fn model_id(&self) -> &str;
    fn timeout_secs(&self) -> u64;
}
