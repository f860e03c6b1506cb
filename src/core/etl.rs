use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct AllocationEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> AllocationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting allocation run");

        tracing::info!("📥 Reading participants...");
        let participants = self.pipeline.extract().await?;
        tracing::info!("Read {} participants", participants.len());
        self.monitor.log_stats("Extract");

        tracing::info!("🧮 Solving assignment...");
        let result = self.pipeline.transform(participants).await?;
        tracing::info!(
            "Assigned {} participants, {} left unassigned",
            result.report.assignments.len(),
            result.report.unassigned.len()
        );
        self.monitor.log_stats("Transform");

        tracing::info!("💾 Writing results...");
        let output_path = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
