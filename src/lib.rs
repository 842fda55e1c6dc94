pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{DetectorSettings, FileConfig, ResolverConfig};

pub use crate::core::detector::ModelDetector;
pub use crate::core::engine::ResolutionEngine;
pub use crate::core::orchestrator::Orchestrator;
pub use crate::core::resolver::PolicyResolver;
pub use utils::error::{Result, VisionError};
