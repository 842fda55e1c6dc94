use crate::domain::model::{
    AggregatedResult, Detection, Locality, PolicyQuery, PolicyResult, ResolvedDetection,
};
use crate::domain::ports::PolicyAdvisor;
use std::collections::HashMap;

/// Fans a detection batch out into per-material policy lookups and assembles
/// the final aggregated response.
pub struct Orchestrator<A: PolicyAdvisor> {
    advisor: A,
}

impl<A: PolicyAdvisor> Orchestrator<A> {
    pub fn new(advisor: A) -> Self {
        Self { advisor }
    }

    /// Resolves every detection against the locality's disposal policy.
    ///
    /// The advisor is invoked exactly once per distinct material label
    /// (case-sensitive exact match); duplicate detections reuse the first
    /// resolution. Output order is the input detection order. Empty input
    /// returns an empty result without touching the advisor.
    pub async fn resolve_all(
        &self,
        detections: Vec<Detection>,
        locality: &Locality,
    ) -> AggregatedResult {
        if detections.is_empty() {
            return AggregatedResult::default();
        }

        // 相同材質共用一次查詢，限制對外呼叫數量
        let mut resolved: HashMap<String, PolicyResult> = HashMap::new();
        let mut items = Vec::with_capacity(detections.len());

        for detection in detections {
            let policy = match resolved.get(&detection.label) {
                Some(existing) => existing.clone(),
                None => {
                    let query = PolicyQuery {
                        city: locality.city.clone(),
                        material: detection.label.clone(),
                    };
                    let policy = self.advisor.resolve(&query).await;
                    resolved.insert(detection.label.clone(), policy.clone());
                    policy
                }
            };

            items.push(ResolvedDetection { detection, policy });
        }

        tracing::debug!(
            "🔄 Resolved {} detections across {} distinct materials",
            items.len(),
            resolved.len()
        );

        AggregatedResult { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Bin;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct RecordingAdvisor {
        queries: Arc<Mutex<Vec<PolicyQuery>>>,
    }

    impl RecordingAdvisor {
        fn new() -> Self {
            Self {
                queries: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl PolicyAdvisor for RecordingAdvisor {
        async fn resolve(&self, query: &PolicyQuery) -> PolicyResult {
            let mut queries = self.queries.lock().await;
            queries.push(query.clone());
            PolicyResult {
                bin: Bin::Recycling,
                reasoning: format!("{} is recyclable in {}", query.material, query.city),
                confidence: 0.9,
            }
        }
    }

    fn detection(label: &str, confidence: f64) -> Detection {
        Detection {
            label: label.to_string(),
            confidence,
        }
    }

    fn seattle() -> Locality {
        Locality {
            city: "Seattle".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolve_all_deduplicates_materials() {
        let advisor = RecordingAdvisor::new();
        let queries = advisor.queries.clone();
        let orchestrator = Orchestrator::new(advisor);

        let detections = vec![
            detection("plastic", 0.912),
            detection("plastic", 0.455),
            detection("metal", 0.77),
        ];

        let result = orchestrator.resolve_all(detections, &seattle()).await;

        // 2 distinct materials -> exactly 2 advisor calls
        let recorded = queries.lock().await;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].material, "plastic");
        assert_eq!(recorded[1].material, "metal");

        // every original detection appears, in order, with its own confidence
        assert_eq!(result.items.len(), 3);
        assert_eq!(result.items[0].detection.confidence, 0.912);
        assert_eq!(result.items[1].detection.confidence, 0.455);
        assert_eq!(result.items[2].detection.label, "metal");

        // duplicate materials share one resolution
        assert_eq!(result.items[0].policy, result.items[1].policy);
    }

    #[tokio::test]
    async fn test_resolve_all_empty_input_makes_no_calls() {
        let advisor = RecordingAdvisor::new();
        let queries = advisor.queries.clone();
        let orchestrator = Orchestrator::new(advisor);

        let result = orchestrator.resolve_all(vec![], &seattle()).await;

        assert!(result.items.is_empty());
        assert_eq!(queries.lock().await.len(), 0);
    }

    #[tokio::test]
    async fn test_resolve_all_material_match_is_case_sensitive() {
        let advisor = RecordingAdvisor::new();
        let queries = advisor.queries.clone();
        let orchestrator = Orchestrator::new(advisor);

        let detections = vec![detection("Plastic", 0.8), detection("plastic", 0.7)];

        let result = orchestrator.resolve_all(detections, &seattle()).await;

        assert_eq!(queries.lock().await.len(), 2);
        assert_eq!(result.items.len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_all_passes_city_through() {
        let advisor = RecordingAdvisor::new();
        let queries = advisor.queries.clone();
        let orchestrator = Orchestrator::new(advisor);

        let locality = Locality {
            city: "Portland".to_string(),
        };
        orchestrator
            .resolve_all(vec![detection("glass", 0.6)], &locality)
            .await;

        assert_eq!(queries.lock().await[0].city, "Portland");
    }
}
