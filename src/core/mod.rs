pub mod detector;
pub mod engine;
pub mod orchestrator;
pub mod resolver;

pub use crate::domain::model::{
    AggregatedResult, Bin, Detection, Locality, PolicyQuery, PolicyResult, RawDetection,
    ResolvedDetection,
};
pub use crate::domain::ports::{ConfigProvider, Detector, PolicyAdvisor, VisionModel};
pub use crate::utils::error::Result;
