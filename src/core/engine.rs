use crate::core::orchestrator::Orchestrator;
use crate::domain::model::{AggregatedResult, Locality};
use crate::domain::ports::{Detector, PolicyAdvisor};
use crate::utils::error::Result;
use std::path::Path;

/// Runs the full detection-to-policy pipeline for one image.
///
/// Only the detection stage can fail (model / IO); policy resolution always
/// produces a value, so a request that reaches the orchestrator always gets a
/// well-formed aggregated result.
pub struct ResolutionEngine<D: Detector, A: PolicyAdvisor> {
    detector: D,
    orchestrator: Orchestrator<A>,
}

impl<D: Detector, A: PolicyAdvisor> ResolutionEngine<D, A> {
    pub fn new(detector: D, advisor: A) -> Self {
        Self {
            detector,
            orchestrator: Orchestrator::new(advisor),
        }
    }

    pub async fn run(&self, image: &Path, locality: &Locality) -> Result<AggregatedResult> {
        tracing::info!("📥 Detecting waste items in {}", image.display());
        let detections = self.detector.detect(image).await?;
        tracing::info!("📥 Detected {} items", detections.len());

        let result = self.orchestrator.resolve_all(detections, locality).await;
        tracing::info!(
            "✅ Resolved {} detections for {}",
            result.items.len(),
            locality.city
        );

        Ok(result)
    }
}
