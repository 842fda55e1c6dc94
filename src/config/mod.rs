pub mod settings;

#[cfg(feature = "cli")]
pub mod cli;

pub use settings::{DetectorSettings, FileConfig, ResolverConfig};

#[cfg(feature = "cli")]
pub use cli::CliConfig;
