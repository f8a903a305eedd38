pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{RunTestsConfig, ScrapeConfig};
pub use config::{ArtifactExt, BuildProfile, LocalStorage};

pub use crate::core::engine::Engine;
pub use crate::core::harness::HarnessEngine;
pub use crate::core::scrape::FormulaPipeline;
pub use crate::core::toolchain::SystemToolchain;
pub use utils::error::{Result, ToolError};
