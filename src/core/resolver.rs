use crate::domain::model::{Bin, PolicyQuery, PolicyResult};
use crate::domain::ports::{ConfigProvider, PolicyAdvisor};
use crate::utils::error::{Result, VisionError};
use reqwest::Client;
use std::time::Duration;

const ROLE_PREAMBLE: &str = "You are a waste-disposal policy assistant. Given a CITY and a MATERIAL, \
    output which BIN the item belongs in (Recycling, Compost, Landfill, Hazardous). \
    Prefer city-specific policy if known; otherwise give the best state policy or \
    general US recommendation and lower confidence.";

/// 把 (city, material) 轉成指示文字，要求服務只回傳單一 JSON 物件
pub fn build_prompt(city: &str, material: &str) -> String {
    format!(
        "{ROLE_PREAMBLE}\n\
         CITY: {city}\n\
         MATERIAL: {material}\n\
         \n\
         Return ONLY this JSON (no prose):\n\
         {{\n  \"bin\": \"Recycling|Compost|Landfill|Hazardous|Unknown\",\n  \"reasoning\": \"<one short sentence>\",\n  \"confidence\": 0.0-1.0\n}}\n"
    )
}

/// Locates the candidate JSON object inside free-form reply text: the
/// substring from the first `{` to the last `}`, inclusive.
pub fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Validates extracted reply text into a `PolicyResult`.
///
/// Unparsable text or a missing `bin`/`reasoning` field degrades to the
/// "parse failure" fallback. A well-formed object with an out-of-enum `bin`
/// keeps the upstream reasoning and only substitutes `Unknown`; a missing or
/// non-numeric `confidence` defaults to 0.5, and numeric values are clamped
/// to [0, 1].
pub fn parse_policy_text(text: &str) -> PolicyResult {
    let Some(raw) = extract_object(text) else {
        return PolicyResult::fallback("parse failure");
    };

    let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
        return PolicyResult::fallback("parse failure");
    };

    let (Some(bin_raw), Some(reasoning)) = (
        value.get("bin").and_then(|v| v.as_str()),
        value.get("reasoning").and_then(|v| v.as_str()),
    ) else {
        return PolicyResult::fallback("parse failure");
    };

    let confidence = value
        .get("confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.5)
        .clamp(0.0, 1.0);

    PolicyResult {
        bin: Bin::parse(bin_raw).unwrap_or(Bin::Unknown),
        reasoning: reasoning.to_string(),
        confidence,
    }
}

/// Resolves disposal policy through an external generative-language service.
///
/// All failure modes (missing credential, transport error, timeout, malformed
/// reply) collapse into typed fallback values; `resolve` itself never fails.
pub struct PolicyResolver<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> PolicyResolver<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn request_url(&self, credential: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.endpoint().trim_end_matches('/'),
            self.config.model_id(),
            credential
        )
    }

    /// 單次呼叫，不重試；回傳 candidates[0] 的文字內容
    async fn dispatch(&self, prompt: &str, credential: &str) -> Result<String> {
        let payload = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {"temperature": 0.2, "maxOutputTokens": 128},
        });

        let response = self
            .client
            .post(self.request_url(credential))
            .timeout(Duration::from_secs(self.config.timeout_secs()))
            .json(&payload)
            .send()
            .await?;

        tracing::debug!("📡 Policy service response status: {}", response.status());

        if !response.status().is_success() {
            return Err(VisionError::ProcessingError {
                message: format!("policy service returned status {}", response.status()),
            });
        }

        let body: serde_json::Value = response.json().await?;
        let text = body
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(text)
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> PolicyAdvisor for PolicyResolver<C> {
    async fn resolve(&self, query: &PolicyQuery) -> PolicyResult {
        // 未設定金鑰就直接短路，不做任何網路嘗試
        let Some(credential) = self.config.credential() else {
            tracing::debug!(
                "🔑 No credential configured, skipping policy lookup for '{}'",
                query.material
            );
            return PolicyResult::fallback("credential not set");
        };

        let prompt = build_prompt(&query.city, &query.material);
        tracing::debug!(
            "📡 Resolving disposal policy for '{}' in {}",
            query.material,
            query.city
        );

        match self.dispatch(&prompt, credential).await {
            Ok(text) => parse_policy_text(&text),
            Err(e) => {
                tracing::warn!("❌ Policy lookup for '{}' failed: {}", query.material, e);
                PolicyResult::fallback("policy service unreachable")
            }
        }
    }
}
