pub mod engine;
pub mod harness;
pub mod scrape;
pub mod toolchain;

pub use crate::domain::model::{
    CompileJob, CompileOutcome, FormulaRow, HarnessReport, RunOutcome, ScrapeResult, ScrapedTable,
    TestCase, TestResult,
};
pub use crate::domain::ports::{Pipeline, ScrapeOptions, Storage, Toolchain};
pub use crate::utils::error::Result;
