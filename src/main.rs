use clap::Parser;
use dsa_tools::utils::error::ErrorSeverity;
use dsa_tools::utils::monitor::SystemMonitor;
use dsa_tools::utils::{logger, validation::Validate};
use dsa_tools::{BuildProfile, HarnessEngine, RunTestsConfig, SystemToolchain};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RunTestsConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting C test harness");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let mut profile = match BuildProfile::load_or_default(&config.config) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("❌ Failed to load profile '{}': {}", config.config, e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };
    config.apply_to(&mut profile);

    if let Err(e) = profile.validate() {
        tracing::error!("❌ Profile validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    let monitor = SystemMonitor::new(config.monitor);
    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let toolchain = SystemToolchain::new(profile.cc.clone());
    let engine = HarnessEngine::new(profile, toolchain);

    match engine.run().await {
        Ok(report) => {
            if let Some(path) = &config.report {
                engine.write_report(&report, path)?;
                tracing::info!("📁 Report written to: {}", path);
            }

            monitor.log_summary();

            if report.overall_pass() {
                println!("✅ {}", report.summary());
            } else {
                println!("❌ {}", report.summary());
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Harness failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
