use crate::domain::model::Detection;
use crate::domain::ports::{Detector, VisionModel};
use crate::utils::error::{Result, VisionError};
use std::path::Path;

/// Material classes the bundled waste model was trained on.
pub const DEFAULT_CLASSES: [&str; 6] = ["cardboard", "glass", "metal", "paper", "plastic", "trash"];

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// 權重檔不存在是初始化階段唯一的致命錯誤，必須大聲失敗
pub fn ensure_weights(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(VisionError::ModelError {
            message: format!("model weights not found at {}", path.display()),
        })
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Normalizes raw model output into the pipeline's `Detection` records.
///
/// Order is whatever the model reports, preserved as-is; confidences are
/// rounded to 3 decimal places for stable comparison and display. The input
/// image is never mutated or persisted.
pub struct ModelDetector<M: VisionModel> {
    model: M,
    confidence_threshold: f32,
}

impl<M: VisionModel> ModelDetector<M> {
    pub fn new(model: M) -> Self {
        Self::with_threshold(model, DEFAULT_CONFIDENCE_THRESHOLD)
    }

    pub fn with_threshold(model: M, confidence_threshold: f32) -> Self {
        Self {
            model,
            confidence_threshold,
        }
    }
}

#[async_trait::async_trait]
impl<M: VisionModel> Detector for ModelDetector<M> {
    async fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
        let raw = self.model.predict(image, self.confidence_threshold)?;
        tracing::debug!(
            "📥 Model reported {} instances for {}",
            raw.len(),
            image.display()
        );

        Ok(raw
            .into_iter()
            .map(|instance| Detection {
                label: instance.label,
                confidence: round3(instance.confidence),
            })
            .collect())
    }
}
