use crate::domain::model::{CompileJob, CompileOutcome, RunOutcome, ScrapeResult, ScrapedTable};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ScrapeOptions: Send + Sync {
    fn page_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ScrapedTable>>;
    async fn transform(&self, tables: Vec<ScrapedTable>) -> Result<ScrapeResult>;
    async fn load(&self, result: ScrapeResult) -> Result<String>;
}

/// Boundary to the system C compiler and the produced test binaries.
#[async_trait]
pub trait Toolchain: Send + Sync {
    async fn compile(&self, job: &CompileJob) -> Result<CompileOutcome>;
    async fn execute(&self, stem: &str, artifact: &Path) -> Result<RunOutcome>;
}
