use crate::core::Toolchain;
use crate::domain::model::{CompileJob, CompileOutcome, RunOutcome};
use crate::utils::error::{Result, ToolError};
use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tokio::process::Command;

/// Invokes the system C compiler and the binaries it produces.
pub struct SystemToolchain {
    cc: String,
}

impl SystemToolchain {
    pub fn new(cc: impl Into<String>) -> Self {
        Self { cc: cc.into() }
    }

    pub fn cc(&self) -> &str {
        &self.cc
    }
}

#[async_trait]
impl Toolchain for SystemToolchain {
    async fn compile(&self, job: &CompileJob) -> Result<CompileOutcome> {
        let start = Instant::now();

        let mut cmd = Command::new(&self.cc);
        cmd.args(&job.flags);
        for dir in &job.include_dirs {
            cmd.arg(format!("-I{}", dir.display()));
        }
        cmd.arg("-o").arg(&job.artifact);
        cmd.args(&job.sources);

        tracing::debug!("Compile command for {}: {:?}", job.stem, cmd.as_std());

        let output = cmd.output().await.map_err(|e| ToolError::ToolchainError {
            message: format!("failed to invoke {}: {}", self.cc, e),
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !stderr.is_empty() {
            tracing::debug!("{} compiler output:\n{}", job.stem, stderr);
        }

        Ok(CompileOutcome {
            stem: job.stem.clone(),
            artifact: job.artifact.clone(),
            success: output.status.success(),
            exit_code: output.status.code(),
            stderr,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn execute(&self, stem: &str, artifact: &Path) -> Result<RunOutcome> {
        let start = Instant::now();

        let output = Command::new(artifact)
            .output()
            .await
            .map_err(|e| ToolError::ToolchainError {
                message: format!("failed to run {}: {}", artifact.display(), e),
            })?;

        if !output.stdout.is_empty() {
            tracing::debug!(
                "{} stdout:\n{}",
                stem,
                String::from_utf8_lossy(&output.stdout)
            );
        }
        if !output.stderr.is_empty() {
            tracing::debug!(
                "{} stderr:\n{}",
                stem,
                String::from_utf8_lossy(&output.stderr)
            );
        }

        Ok(RunOutcome {
            stem: stem.to_string(),
            exit_code: output.status.code(),
            passed: output.status.success(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
