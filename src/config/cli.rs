use crate::config::profile::BuildProfile;
use crate::core::ScrapeOptions;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_URL: &str = "https://en.wikipedia.org/wiki/Glossary_of_chemical_formulae";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "scrape-formulae")]
#[command(about = "Scrape chemical formula tables from a Wikipedia page into a CSV file")]
pub struct ScrapeConfig {
    #[arg(long, default_value = DEFAULT_PAGE_URL)]
    pub page_url: String,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = "data.csv")]
    pub output_file: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Report CPU/memory usage at the end of the run")]
    pub monitor: bool,
}

impl ScrapeOptions for ScrapeConfig {
    fn page_url(&self) -> &str {
        &self.page_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }
}

impl Validate for ScrapeConfig {
    fn validate(&self) -> Result<()> {
        validate_url("page_url", &self.page_url)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("output_file", &self.output_file)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "run-tests")]
#[command(about = "Compile and run the C test suite, aggregating exit codes")]
pub struct RunTestsConfig {
    /// Pass `clean` to remove build artifacts after the run.
    #[arg(value_parser = ["clean"])]
    pub mode: Option<String>,

    /// Path to a TOML build profile; built-in defaults are used when absent.
    #[arg(short, long, default_value = "harness.toml")]
    pub config: String,

    #[arg(long)]
    pub tests_dir: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub source_dirs: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub include_dirs: Vec<String>,

    #[arg(long)]
    pub bin_dir: Option<String>,

    /// C compiler to invoke.
    #[arg(long)]
    pub cc: Option<String>,

    /// Write the batch report as JSON to this path.
    #[arg(long)]
    pub report: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Report CPU/memory usage at the end of the run")]
    pub monitor: bool,
}

impl RunTestsConfig {
    /// Overlay command-line overrides onto a loaded profile.
    pub fn apply_to(&self, profile: &mut BuildProfile) {
        if let Some(tests_dir) = &self.tests_dir {
            profile.tests_dir = tests_dir.clone();
        }
        if !self.source_dirs.is_empty() {
            profile.source_dirs = self.source_dirs.clone();
        }
        if !self.include_dirs.is_empty() {
            profile.include_dirs = self.include_dirs.clone();
        }
        if let Some(bin_dir) = &self.bin_dir {
            profile.bin_dir = bin_dir.clone();
        }
        if let Some(cc) = &self.cc {
            profile.cc = cc.clone();
        }
        if self.mode.as_deref() == Some("clean") {
            profile.clean = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_config_defaults_validate() {
        let config = ScrapeConfig::parse_from(["scrape-formulae"]);
        assert_eq!(config.page_url, DEFAULT_PAGE_URL);
        assert_eq!(config.output_file, "data.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scrape_config_rejects_bad_url() {
        let config = ScrapeConfig::parse_from(["scrape-formulae", "--page-url", "not-a-url"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_clean_positional_sets_profile_flag() {
        let config = RunTestsConfig::parse_from(["run-tests", "clean"]);
        let mut profile = BuildProfile::default();
        assert!(!profile.clean);
        config.apply_to(&mut profile);
        assert!(profile.clean);
    }

    #[test]
    fn test_rejects_unknown_positional() {
        assert!(RunTestsConfig::try_parse_from(["run-tests", "mangle"]).is_err());
    }

    #[test]
    fn test_cli_overrides_replace_profile_values() {
        let config = RunTestsConfig::parse_from([
            "run-tests",
            "--cc",
            "clang",
            "--source-dirs",
            "src-alt,extra",
            "--bin-dir",
            "out",
        ]);
        let mut profile = BuildProfile::default();
        config.apply_to(&mut profile);
        assert_eq!(profile.cc, "clang");
        assert_eq!(
            profile.source_dirs,
            vec!["src-alt".to_string(), "extra".to_string()]
        );
        assert_eq!(profile.bin_dir, "out");
        // Fields without overrides are untouched
        assert_eq!(profile.tests_dir, "tests");
    }
}
