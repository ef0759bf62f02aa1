use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitor.is_enabled()
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting book ETL process...");
        if self.monitor.is_enabled() {
            tracing::info!("🔍 Monitoring phases and HTTP round trips");
        }
        self.monitor.log_stats("Start", self.pipeline.requests_sent());

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", raw_data.len());
        self.monitor.log_stats("Extract", self.pipeline.requests_sent());

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Transformed {} records ({} skipped)",
            transformed.processed_records.len(),
            transformed.skipped.len()
        );
        self.monitor.log_stats("Transform", self.pipeline.requests_sent());

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        self.monitor.log_final_stats(self.pipeline.requests_sent());

        Ok(output_path)
    }
}
