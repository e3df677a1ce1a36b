use crate::core::Pipeline;
use crate::schema::{DatasetDescriptor, ProjectStatus};
use crate::utils::error::Result;
use crate::utils::monitor::ResourceMonitor;

/// Drives a [`Pipeline`] through load, cleaning and preprocessing while
/// tracking the project's [`ProjectStatus`].
pub struct AutoMlEngine<P: Pipeline> {
    pipeline: P,
    monitor: ResourceMonitor,
    status: ProjectStatus,
    history: Vec<ProjectStatus>,
}

impl<P: Pipeline> AutoMlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ResourceMonitor::new(monitor_enabled),
            status: ProjectStatus::Init,
            history: vec![ProjectStatus::Init],
        }
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Every status reached so far, starting with `INIT`.
    pub fn history(&self) -> &[ProjectStatus] {
        &self.history
    }

    pub fn monitor(&self) -> &ResourceMonitor {
        &self.monitor
    }

    fn advance(&mut self, status: ProjectStatus) {
        tracing::debug!("Project status {} -> {}", self.status, status);
        self.status = status;
        self.history.push(status);
    }

    /// Loads and profiles the dataset without cleaning or writing anything.
    pub async fn profile(&mut self) -> Result<DatasetDescriptor> {
        self.advance(ProjectStatus::DataLoad);
        let data = self.pipeline.extract().await?;
        tracing::info!("Loaded {} rows x {} columns", data.n_rows(), data.n_cols());
        self.monitor.log_stage("Load");

        let descriptor = self.pipeline.profile(&data).await?;
        self.monitor.log_summary();
        Ok(descriptor)
    }

    pub async fn run(&mut self) -> Result<String> {
        tracing::info!("Starting AutoML data preparation");
        self.monitor.log_stage("Start");

        self.advance(ProjectStatus::DataLoad);
        let data = self.pipeline.extract().await?;
        tracing::info!("Loaded {} rows x {} columns", data.n_rows(), data.n_cols());
        self.monitor.log_stage("Load");

        self.advance(ProjectStatus::Cleaning);
        let cleaned = self.pipeline.clean(data).await?;
        tracing::info!(
            "Cleaned dataset has {} rows, task type {}",
            cleaned.frame.n_rows(),
            cleaned.task_type
        );
        self.monitor.log_stage("Clean");

        self.advance(ProjectStatus::Preprocessing);
        let result = self.pipeline.preprocess(cleaned).await?;
        tracing::info!(
            "Prepared {} rows with {} feature(s)",
            result.prepared.n_rows(),
            result.feature_names.len()
        );
        self.monitor.log_stage("Preprocess");

        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stage("Save");
        self.monitor.log_summary();

        Ok(output_path)
    }
}
