#![cfg(unix)]

use dsa_tools::{BuildProfile, HarnessEngine, SystemToolchain, ToolError};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;

/// Stand-in compiler. It scans its arguments for `-o <artifact>`, treats the
/// last non-option argument as the test source, refuses to "compile" sources
/// named `*broken*`, and otherwise emits a tiny script whose exit code
/// depends on whether the source is named `*fail*`.
const FAKE_CC: &str = r#"#!/bin/sh
out=""
last=""
while [ $# -gt 0 ]; do
  if [ "$1" = "-o" ]; then
    shift
    out="$1"
  else
    last="$1"
  fi
  shift
done
case "$last" in
  *broken*) echo "syntax error in $last" >&2; exit 1 ;;
  *fail*) printf '#!/bin/sh\nexit 1\n' > "$out" ;;
  *) printf '#!/bin/sh\nexit 0\n' > "$out" ;;
esac
chmod +x "$out"
"#;

fn setup(temp: &TempDir, test_files: &[&str]) -> BuildProfile {
    let tests_dir = temp.path().join("tests");
    let src_dir = temp.path().join("src");
    fs::create_dir_all(&tests_dir).unwrap();
    fs::create_dir_all(&src_dir).unwrap();
    fs::write(src_dir.join("stack.c"), "/* library source */\n").unwrap();

    for name in test_files {
        fs::write(tests_dir.join(name), "/* test source */\n").unwrap();
    }

    let cc_path = temp.path().join("fakecc");
    fs::write(&cc_path, FAKE_CC).unwrap();
    let mut perms = fs::metadata(&cc_path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&cc_path, perms).unwrap();

    BuildProfile {
        tests_dir: tests_dir.to_str().unwrap().to_string(),
        source_dirs: vec![src_dir.to_str().unwrap().to_string()],
        include_dirs: vec![src_dir.to_str().unwrap().to_string()],
        bin_dir: temp.path().join("bin").to_str().unwrap().to_string(),
        cc: cc_path.to_str().unwrap().to_string(),
        ..BuildProfile::default()
    }
}

fn engine_for(profile: BuildProfile) -> HarnessEngine<SystemToolchain> {
    let toolchain = SystemToolchain::new(profile.cc.clone());
    HarnessEngine::new(profile, toolchain)
}

#[tokio::test]
async fn test_mixed_batch_fails_overall() {
    let temp = TempDir::new().unwrap();
    let profile = setup(&temp, &["pass_tests.c", "fail_tests.c"]);
    let bin_dir = profile.bin_dir.clone();

    let report = engine_for(profile).run().await.unwrap();

    assert!(!report.overall_pass());
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.passed_count(), 1);

    // Sorted batch order: fail_tests then pass_tests
    let fail = &report.results[0];
    assert!(fail.compile.success);
    let run = fail.run.as_ref().unwrap();
    assert!(!run.passed);
    assert_eq!(run.exit_code, Some(1));

    let pass = &report.results[1];
    assert!(pass.passed());
    assert_eq!(pass.run.as_ref().unwrap().exit_code, Some(0));

    // Artifacts land in the bin dir with the .bin extension
    assert!(Path::new(&bin_dir).join("pass_tests.bin").exists());
    assert!(Path::new(&bin_dir).join("fail_tests.bin").exists());
}

#[tokio::test]
async fn test_all_passing_batch_succeeds() {
    let temp = TempDir::new().unwrap();
    let profile = setup(&temp, &["stack_tests.c", "fstack_tests.c"]);

    let report = engine_for(profile).run().await.unwrap();

    assert!(report.overall_pass());
    assert_eq!(report.passed_count(), 2);
    assert_eq!(report.summary(), "2 passed, 0 failed out of 2 tests");
}

#[tokio::test]
async fn test_compile_failure_skips_execution_and_fails_overall() {
    let temp = TempDir::new().unwrap();
    let profile = setup(&temp, &["broken_tests.c", "pass_tests.c"]);

    let report = engine_for(profile).run().await.unwrap();

    assert!(!report.overall_pass());

    let broken = &report.results[0];
    assert!(!broken.compile.success);
    assert!(broken.compile.stderr.contains("syntax error"));
    assert!(broken.run.is_none());

    // The rest of the batch still ran
    assert!(report.results[1].passed());
}

#[tokio::test]
async fn test_clean_removes_artifacts_after_run() {
    let temp = TempDir::new().unwrap();
    let mut profile = setup(&temp, &["pass_tests.c"]);
    profile.clean = true;
    let bin_dir = profile.bin_dir.clone();

    let report = engine_for(profile).run().await.unwrap();

    assert!(report.overall_pass());
    assert!(!Path::new(&bin_dir).join("pass_tests.bin").exists());
    assert!(!Path::new(&bin_dir).exists());
}

#[tokio::test]
async fn test_missing_compiler_is_a_toolchain_error() {
    let temp = TempDir::new().unwrap();
    let mut profile = setup(&temp, &["pass_tests.c"]);
    profile.cc = temp
        .path()
        .join("no-such-compiler")
        .to_str()
        .unwrap()
        .to_string();

    let err = engine_for(profile).run().await.unwrap_err();
    assert!(matches!(err, ToolError::ToolchainError { .. }));
}

#[tokio::test]
async fn test_empty_tests_dir_passes_vacuously() {
    let temp = TempDir::new().unwrap();
    let profile = setup(&temp, &[]);

    let report = engine_for(profile).run().await.unwrap();
    assert!(report.overall_pass());
    assert!(report.results.is_empty());
}
