use serde::{Deserialize, Serialize};

/// 底層視覺模型的單筆原始輸出
///
/// The pipeline only consumes `label` and `confidence`; the box geometry is
/// carried through untouched for callers that want to draw overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub label: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<[f32; 4]>,
}

/// 正規化後的偵測結果（信心值固定三位小數）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f64,
}

/// The place disposal policy is being requested for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    pub city: String,
}

/// One (city, material) lookup; built once per distinct material in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyQuery {
    pub city: String,
    pub material: String,
}

/// 封閉的垃圾桶分類集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bin {
    Recycling,
    Compost,
    Landfill,
    Hazardous,
    Unknown,
}

impl Bin {
    /// Returns `None` for any string outside the five-member set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Recycling" => Some(Bin::Recycling),
            "Compost" => Some(Bin::Compost),
            "Landfill" => Some(Bin::Landfill),
            "Hazardous" => Some(Bin::Hazardous),
            "Unknown" => Some(Bin::Unknown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bin::Recycling => "Recycling",
            Bin::Compost => "Compost",
            Bin::Landfill => "Landfill",
            Bin::Hazardous => "Hazardous",
            Bin::Unknown => "Unknown",
        }
    }
}

/// A validated disposal recommendation.
///
/// Invariants: `bin` is always one of the five enum members and `confidence`
/// is always inside `[0, 1]`, no matter what the upstream service returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyResult {
    pub bin: Bin,
    pub reasoning: String,
    pub confidence: f64,
}

impl PolicyResult {
    /// 解析失敗或服務不可用時的固定回退值
    pub fn fallback(reasoning: &str) -> Self {
        Self {
            bin: Bin::Unknown,
            reasoning: reasoning.to_string(),
            confidence: 0.0,
        }
    }
}

/// One original detection paired with its material's resolved policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDetection {
    pub detection: Detection,
    pub policy: PolicyResult,
}

/// Final per-image response: original detection order, duplicate materials
/// share one resolution but keep their own detection confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub items: Vec<ResolvedDetection>,
}
