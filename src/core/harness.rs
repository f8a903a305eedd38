use crate::config::profile::BuildProfile;
use crate::core::Toolchain;
use crate::domain::model::{CompileJob, HarnessReport, TestCase, TestResult};
use crate::utils::error::Result;
use crate::utils::validation::validate_regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Compile-then-execute driver for the C test suite. Tests are discovered
/// by filename convention, built one at a time against the profile's
/// library sources, run sequentially, and their exit codes aggregated.
pub struct HarnessEngine<T: Toolchain> {
    profile: BuildProfile,
    toolchain: T,
}

impl<T: Toolchain> HarnessEngine<T> {
    pub fn new(profile: BuildProfile, toolchain: T) -> Self {
        Self { profile, toolchain }
    }

    pub fn profile(&self) -> &BuildProfile {
        &self.profile
    }

    /// Test sources under `tests_dir` whose names match the profile's
    /// pattern, sorted by stem for a deterministic batch order.
    pub fn discover(&self) -> Result<Vec<TestCase>> {
        let pattern = validate_regex("test_pattern", &self.profile.test_pattern)?;

        let mut cases = Vec::new();
        for entry in fs::read_dir(&self.profile.tests_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if pattern.is_match(&name) {
                let stem = name.strip_suffix(".c").unwrap_or(&name).to_string();
                cases.push(TestCase {
                    stem,
                    source: entry.path(),
                });
            }
        }

        cases.sort_by(|a, b| a.stem.cmp(&b.stem));
        Ok(cases)
    }

    /// Library sources compiled into every test binary: `*.c` directly under
    /// each source dir, plus one subdirectory level when `nested_sources`.
    fn collect_sources(&self) -> Result<Vec<PathBuf>> {
        let mut sources = Vec::new();
        for dir in &self.profile.source_dirs {
            collect_c_files(Path::new(dir), self.profile.nested_sources, &mut sources)?;
        }
        sources.sort();
        Ok(sources)
    }

    fn compile_job(&self, case: &TestCase, lib_sources: &[PathBuf]) -> CompileJob {
        let artifact = Path::new(&self.profile.bin_dir).join(format!(
            "{}.{}",
            case.stem,
            self.profile.artifact_ext.as_str()
        ));

        let mut sources = lib_sources.to_vec();
        sources.push(case.source.clone());

        CompileJob {
            stem: case.stem.clone(),
            flags: self.profile.cflags.clone(),
            include_dirs: self.profile.include_dirs.iter().map(PathBuf::from).collect(),
            sources,
            artifact,
        }
    }

    /// Run the whole batch. A compile or test failure does not abort the
    /// batch; it is recorded and flips the aggregate result.
    pub async fn run(&self) -> Result<HarnessReport> {
        let cases = self.discover()?;
        if cases.is_empty() {
            tracing::warn!(
                "No test sources matching '{}' under {}",
                self.profile.test_pattern,
                self.profile.tests_dir
            );
        }

        let lib_sources = self.collect_sources()?;
        tracing::debug!(
            "{} test sources, {} library sources",
            cases.len(),
            lib_sources.len()
        );

        fs::create_dir_all(&self.profile.bin_dir)?;

        let mut results = Vec::new();
        for case in &cases {
            let job = self.compile_job(case, &lib_sources);

            tracing::info!("Compiling {}", case.stem);
            let compile = self.toolchain.compile(&job).await?;

            let run = if compile.success {
                tracing::info!("Running {}", case.stem);
                let outcome = self.toolchain.execute(&case.stem, &job.artifact).await?;
                if outcome.passed {
                    tracing::info!("{}: ok ({} ms)", case.stem, outcome.duration_ms);
                } else {
                    tracing::warn!(
                        "{}: failed with exit code {:?}",
                        case.stem,
                        outcome.exit_code
                    );
                }
                Some(outcome)
            } else {
                tracing::warn!("Compilation of {} failed:\n{}", case.stem, compile.stderr);
                None
            };

            results.push(TestResult { compile, run });
        }

        if self.profile.clean {
            self.clean_artifacts(&results)?;
        }

        Ok(HarnessReport::new(self.profile.cc.clone(), results))
    }

    fn clean_artifacts(&self, results: &[TestResult]) -> Result<()> {
        for result in results {
            match fs::remove_file(&result.compile.artifact) {
                Ok(()) => tracing::debug!("Removed {}", result.compile.artifact.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        // The bin dir only goes away if nothing else lives in it
        let _ = fs::remove_dir(&self.profile.bin_dir);
        Ok(())
    }

    pub fn write_report(&self, report: &HarnessReport, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn collect_c_files(dir: &Path, nested: bool, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            if nested {
                collect_c_files(&path, false, out)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "c") {
            out.push(path);
        }
    }
    Ok(())
}
