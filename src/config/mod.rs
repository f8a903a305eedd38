#[cfg(feature = "cli")]
pub mod cli;
pub mod profile;
pub mod storage;

#[cfg(feature = "cli")]
pub use cli::{RunTestsConfig, ScrapeConfig};
pub use profile::{ArtifactExt, BuildProfile};
pub use storage::LocalStorage;
