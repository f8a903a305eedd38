use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_list, validate_non_empty_string, validate_path, validate_regex, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Naming scheme for compiled test artifacts. The historical drivers
/// produced either `<stem>.bin` or `<stem>.o`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactExt {
    #[default]
    Bin,
    O,
}

impl ArtifactExt {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactExt::Bin => "bin",
            ArtifactExt::O => "o",
        }
    }
}

/// One build-and-run configuration. The original repository carried several
/// near-identical driver scripts that differed only in these fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildProfile {
    /// Directory scanned for test sources.
    pub tests_dir: String,
    /// Directories whose `*.c` files are compiled into every test binary.
    pub source_dirs: Vec<String>,
    /// When true, also pick up `*.c` one subdirectory down (`src-alt/*/*.c`).
    pub nested_sources: bool,
    pub include_dirs: Vec<String>,
    pub bin_dir: String,
    pub cc: String,
    pub cflags: Vec<String>,
    pub artifact_ext: ArtifactExt,
    /// Regex matched against test source file names.
    pub test_pattern: String,
    /// Remove produced artifacts after the run.
    pub clean: bool,
}

impl Default for BuildProfile {
    fn default() -> Self {
        Self {
            tests_dir: "tests".to_string(),
            source_dirs: vec!["src".to_string()],
            nested_sources: false,
            include_dirs: vec!["src".to_string()],
            bin_dir: "bin".to_string(),
            cc: "gcc".to_string(),
            cflags: vec!["-Wall".to_string(), "-Wextra".to_string()],
            artifact_ext: ArtifactExt::Bin,
            test_pattern: r"_tests\.c$".to_string(),
            clean: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    harness: BuildProfile,
}

impl BuildProfile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let processed = Self::substitute_env_vars(&content);
        let file: ProfileFile = toml::from_str(&processed)?;
        Ok(file.harness)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults
    /// mirroring the original repository layout.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            tracing::debug!("Loading build profile from {}", path.as_ref().display());
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No profile at {}, using built-in defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// Replace `${VAR}` references with environment values. Unknown
    /// variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

impl Validate for BuildProfile {
    fn validate(&self) -> Result<()> {
        validate_path("tests_dir", &self.tests_dir)?;
        validate_non_empty_list("source_dirs", &self.source_dirs)?;
        for dir in &self.include_dirs {
            validate_path("include_dirs", dir)?;
        }
        validate_path("bin_dir", &self.bin_dir)?;
        validate_non_empty_string("cc", &self.cc)?;
        validate_regex("test_pattern", &self.test_pattern)?;
        Ok(())
    }
}
