use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One row of the scraped glossary: a chemical formula and its synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaRow {
    pub formula: String,
    pub synonyms: String,
}

/// A raw HTML table: first row of cell text as headers, the rest as data.
#[derive(Debug, Clone, Default)]
pub struct ScrapedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ScrapeResult {
    pub rows: Vec<FormulaRow>,
    pub tables_seen: usize,
    pub tables_matched: usize,
}

/// A C test source discovered by filename convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub stem: String,
    pub source: PathBuf,
}

/// Everything the toolchain needs to produce one test binary.
#[derive(Debug, Clone)]
pub struct CompileJob {
    pub stem: String,
    pub flags: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    /// Library sources plus the test source, in command-line order.
    pub sources: Vec<PathBuf>,
    pub artifact: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileOutcome {
    pub stem: String,
    pub artifact: PathBuf,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stderr: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub stem: String,
    pub exit_code: Option<i32>,
    pub passed: bool,
    pub duration_ms: u64,
}

/// Compile and run results for a single test. `run` is `None` when the
/// test never compiled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub compile: CompileOutcome,
    pub run: Option<RunOutcome>,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.compile.success && self.run.as_ref().is_some_and(|r| r.passed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessReport {
    pub generated_at: DateTime<Utc>,
    pub compiler: String,
    pub results: Vec<TestResult>,
}

impl HarnessReport {
    pub fn new(compiler: String, results: Vec<TestResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            compiler,
            results,
        }
    }

    /// Full success: every test compiled and every binary exited 0.
    /// An empty batch passes vacuously; the driver warns about it instead.
    pub fn overall_pass(&self) -> bool {
        self.results.iter().all(|r| r.passed())
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed out of {} tests",
            self.passed_count(),
            self.failed_count(),
            self.results.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(stem: &str) -> CompileOutcome {
        CompileOutcome {
            stem: stem.to_string(),
            artifact: PathBuf::from(format!("bin/{}.bin", stem)),
            success: true,
            exit_code: Some(0),
            stderr: String::new(),
            duration_ms: 10,
        }
    }

    fn ran(stem: &str, exit_code: i32) -> RunOutcome {
        RunOutcome {
            stem: stem.to_string(),
            exit_code: Some(exit_code),
            passed: exit_code == 0,
            duration_ms: 5,
        }
    }

    #[test]
    fn test_report_overall_pass_requires_all_green() {
        let report = HarnessReport::new(
            "gcc".to_string(),
            vec![
                TestResult {
                    compile: compiled("stack_tests"),
                    run: Some(ran("stack_tests", 0)),
                },
                TestResult {
                    compile: compiled("fstack_tests"),
                    run: Some(ran("fstack_tests", 1)),
                },
            ],
        );

        assert!(!report.overall_pass());
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.summary(), "1 passed, 1 failed out of 2 tests");
    }

    #[test]
    fn test_report_with_compile_failure_fails() {
        let mut bad = compiled("list_tests");
        bad.success = false;
        bad.exit_code = Some(1);

        let report = HarnessReport::new(
            "gcc".to_string(),
            vec![TestResult {
                compile: bad,
                run: None,
            }],
        );

        assert!(!report.overall_pass());
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn test_empty_report_passes_vacuously() {
        let report = HarnessReport::new("gcc".to_string(), vec![]);
        assert!(report.overall_pass());
        assert_eq!(report.failed_count(), 0);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = HarnessReport::new(
            "gcc".to_string(),
            vec![TestResult {
                compile: compiled("queue_tests"),
                run: Some(ran("queue_tests", 0)),
            }],
        );

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("queue_tests"));
        assert!(json.contains("generated_at"));
    }
}
