use crate::core::{ColumnOverride, ConfigProvider};
use crate::frame::CsvOptions;
use crate::schema::{CleaningStrategy, ImputationScheme, PreprocessingStrategy};
use crate::utils::error::{AutoMlError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_source, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File extensions accepted for local dataset sources.
pub const DATASET_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AutoMlConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub cleaning: CleaningStrategy,
    #[serde(default)]
    pub preprocessing: PreprocessingStrategy,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "ProjectConfig::default_name")]
    pub name: String,
    pub description: Option<String>,
}

impl ProjectConfig {
    fn default_name() -> String {
        "automl".to_string()
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Local path or http(s) URL.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target_columns: Vec<String>,
    #[serde(default)]
    pub csv: CsvOptions,
    #[serde(default)]
    pub columns: Vec<ColumnOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "OutputConfig::default_output_path")]
    pub output_path: String,
    #[serde(default = "OutputConfig::default_bundle_name")]
    pub bundle_name: String,
    #[serde(default)]
    pub include_cleaned: bool,
}

impl OutputConfig {
    fn default_output_path() -> String {
        "./output".to_string()
    }

    fn default_bundle_name() -> String {
        "automl_bundle".to_string()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: Self::default_output_path(),
            bundle_name: Self::default_bundle_name(),
            include_cleaned: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub log_json: bool,
}

impl AutoMlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AutoMlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AutoMlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AutoMlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }

    pub fn log_json(&self) -> bool {
        self.monitoring.log_json
    }
}

impl ConfigProvider for AutoMlConfig {
    fn project_name(&self) -> &str {
        &self.project.name
    }

    fn dataset_source(&self) -> &str {
        &self.dataset.source
    }

    fn target_columns(&self) -> &[String] {
        &self.dataset.target_columns
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn bundle_name(&self) -> &str {
        &self.output.bundle_name
    }

    fn include_cleaned(&self) -> bool {
        self.output.include_cleaned
    }

    fn csv_options(&self) -> &CsvOptions {
        &self.dataset.csv
    }

    fn column_overrides(&self) -> &[ColumnOverride] {
        &self.dataset.columns
    }

    fn cleaning_strategy(&self) -> &CleaningStrategy {
        &self.cleaning
    }

    fn preprocessing_strategy(&self) -> &PreprocessingStrategy {
        &self.preprocessing
    }
}

impl Validate for AutoMlConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("project.name", &self.project.name)?;

        if self.dataset.source.is_empty() {
            return Err(AutoMlError::MissingConfigError {
                field: "dataset.source".to_string(),
            });
        }
        validate_source("dataset.source", &self.dataset.source, DATASET_EXTENSIONS)?;

        for target in &self.dataset.target_columns {
            validate_non_empty_string("dataset.target_columns", target)?;
        }
        if !self.dataset.csv.delimiter.is_ascii() {
            return Err(AutoMlError::InvalidConfigValueError {
                field: "dataset.csv.delimiter".to_string(),
                value: self.dataset.csv.delimiter.to_string(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            });
        }
        for column in &self.dataset.columns {
            validate_non_empty_string("dataset.columns.name", &column.name)?;
            if column.imputation_scheme == Some(ImputationScheme::Value)
                && column.imputation_value.is_none()
            {
                return Err(AutoMlError::MissingConfigError {
                    field: format!("dataset.columns.{}.imputation_value", column.name),
                });
            }
        }

        self.cleaning.validate()?;

        validate_path("output.output_path", &self.output.output_path)?;
        validate_non_empty_string("output.bundle_name", &self.output.bundle_name)
    }
}
