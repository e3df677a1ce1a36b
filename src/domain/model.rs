use crate::core::cleaning::CleaningReport;
use crate::frame::{DataFrame, Scalar};
use crate::schema::{DatasetDescriptor, ImputationScheme, ProjectStatus, TaskType};
use serde::{Deserialize, Serialize};

/// Output of the cleaning stage.
#[derive(Debug, Clone)]
pub struct CleanedData {
    pub descriptor: DatasetDescriptor,
    pub task_type: TaskType,
    /// Judged against the configured imbalance threshold.
    pub is_imbalanced: bool,
    pub report: CleaningReport,
    pub frame: DataFrame,
}

/// Everything `transform` learns about and does to a dataset.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub descriptor: DatasetDescriptor,
    pub task_type: TaskType,
    pub is_imbalanced: bool,
    pub cleaning: CleaningReport,
    pub cleaned: DataFrame,
    pub prepared: DataFrame,
    pub preprocessing_steps: Vec<String>,
    pub feature_names: Vec<String>,
}

impl RunResult {
    pub fn summary(&self, project: &str, status: ProjectStatus) -> RunSummary {
        RunSummary {
            project: project.to_string(),
            status,
            task_type: self.task_type,
            rows: self.prepared.n_rows(),
            columns: self.prepared.n_cols(),
            is_imbalanced: self.is_imbalanced,
            cleaning: self.cleaning.clone(),
            preprocessing_steps: self.preprocessing_steps.clone(),
            feature_names: self.feature_names.clone(),
        }
    }
}

/// Serialized as `report.json` in the output bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub project: String,
    pub status: ProjectStatus,
    pub task_type: TaskType,
    pub rows: usize,
    pub columns: usize,
    pub is_imbalanced: bool,
    pub cleaning: CleaningReport,
    pub preprocessing_steps: Vec<String>,
    pub feature_names: Vec<String>,
}

/// Per-column settings applied to the profiled descriptor before cleaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnOverride {
    pub name: String,
    pub imputation_scheme: Option<ImputationScheme>,
    pub imputation_value: Option<Scalar>,
    pub is_selected: Option<bool>,
}
