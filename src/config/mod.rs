pub mod cli;
pub mod toml_config;

pub use toml_config::AutoMlConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_file_extensions, validate_required_field, validate_source, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "automl")]
#[command(about = "Profile, clean and prepare a tabular dataset for AutoML")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Dataset path or http(s) URL, overrides the config file")]
    pub dataset: Option<String>,

    #[arg(long, value_delimiter = ',', help = "Target column(s), comma separated")]
    pub target: Vec<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long)]
    pub bundle_name: Option<String>,

    #[arg(long, help = "Also write the cleaned dataset to the bundle")]
    pub include_cleaned: bool,

    #[arg(long, help = "Print the dataset descriptor as JSON and exit")]
    pub profile_only: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the config file, if any, and applies the command line overrides.
    pub fn resolve(&self) -> Result<AutoMlConfig> {
        let mut config = match &self.config {
            Some(path) => AutoMlConfig::from_file(path)?,
            None => AutoMlConfig::default(),
        };

        if let Some(dataset) = &self.dataset {
            config.dataset.source = dataset.clone();
        }
        if !self.target.is_empty() {
            config.dataset.target_columns = self.target.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.output.output_path = output_path.clone();
        }
        if let Some(bundle_name) = &self.bundle_name {
            config.output.bundle_name = bundle_name.clone();
        }
        config.output.include_cleaned |= self.include_cleaned;
        config.monitoring.enabled |= self.monitor;
        config.monitoring.log_json |= self.log_json;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match &self.config {
            Some(path) => validate_file_extensions("config", &[path.clone()], &["toml"])?,
            None => {
                validate_required_field("dataset", &self.dataset)?;
            }
        }
        if let Some(dataset) = &self.dataset {
            validate_source("dataset", dataset, toml_config::DATASET_EXTENSIONS)?;
        }
        Ok(())
    }
}
