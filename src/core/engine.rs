use crate::core::Pipeline;
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::monitor::SystemMonitor;

/// Drives a pipeline through its extract/transform/load phases.
pub struct Engine<P: Pipeline> {
    pipeline: P,
    #[cfg(feature = "cli")]
    monitor: SystemMonitor,
}

impl<P: Pipeline> Engine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        #[cfg(not(feature = "cli"))]
        let _ = monitor_enabled;

        Self {
            pipeline,
            #[cfg(feature = "cli")]
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Extracting data...");
        let tables = self.pipeline.extract().await?;
        tracing::info!("Extracted {} tables", tables.len());

        tracing::info!("Transforming data...");
        let result = self.pipeline.transform(tables).await?;
        tracing::info!(
            "Collected {} rows from {} of {} tables",
            result.rows.len(),
            result.tables_matched,
            result.tables_seen
        );

        tracing::info!("Loading data...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        #[cfg(feature = "cli")]
        self.monitor.log_summary();

        Ok(output_path)
    }
}
