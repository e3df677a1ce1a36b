use crate::core::cleaning::Cleaner;
use crate::core::preprocessing::Preprocessor;
use crate::core::{CleanedData, ColumnOverride, ConfigProvider, Pipeline, RunResult, Storage};
use crate::frame::{read_csv, write_csv, DataFrame};
use crate::schema::{DatasetDescriptor, ProjectStatus};
use crate::utils::error::{AutoMlError, Result};
use crate::utils::validation::{is_remote_source, Validate};
use reqwest::Client;
use std::io::Write;
use std::path::Path;
use url::Url;
use zip::write::{FileOptions, ZipWriter};

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// Path resolved by the pipeline's storage.
    File(String),
    Url(Url),
}

impl DatasetSource {
    pub fn parse(source: &str) -> Result<Self> {
        if is_remote_source(source) {
            let url = Url::parse(source).map_err(|e| AutoMlError::InvalidConfigValueError {
                field: "dataset.source".to_string(),
                value: source.to_string(),
                reason: format!("Invalid URL format: {}", e),
            })?;
            Ok(Self::Url(url))
        } else {
            Ok(Self::File(source.to_string()))
        }
    }
}

pub struct AutoMlPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> AutoMlPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!("Downloading dataset from: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("Dataset response status: {}", status);

        if !status.is_success() {
            return Err(AutoMlError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    fn apply_overrides(&self, descriptor: &mut DatasetDescriptor) -> Result<()> {
        for ColumnOverride {
            name,
            imputation_scheme,
            imputation_value,
            is_selected,
        } in self.config.column_overrides()
        {
            let column = descriptor
                .column_mut(name)
                .ok_or_else(|| AutoMlError::column_not_found([name.as_str()]))?;
            if let Some(scheme) = imputation_scheme {
                *column = column
                    .clone()
                    .with_imputation(*scheme, imputation_value.clone())?;
            }
            if let Some(selected) = is_selected {
                column.is_selected = *selected;
            }
        }
        Ok(())
    }

    fn bundle_path(&self) -> String {
        let file = format!("{}.zip", self.config.bundle_name());
        Path::new(self.config.output_path())
            .join(file)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AutoMlPipeline<S, C> {
    async fn extract(&self) -> Result<DataFrame> {
        let bytes = match DatasetSource::parse(self.config.dataset_source())? {
            DatasetSource::Url(url) => self.fetch(&url).await?,
            DatasetSource::File(path) => {
                tracing::debug!("Reading dataset from storage: {}", path);
                self.storage.read_file(&path).await?
            }
        };

        let frame = read_csv(bytes.as_slice(), self.config.csv_options())?;
        if frame.is_empty() {
            return Err(AutoMlError::EmptyFrame);
        }
        Ok(frame)
    }

    async fn profile(&self, data: &DataFrame) -> Result<DatasetDescriptor> {
        let mut descriptor = DatasetDescriptor::build_from_dataset(data, self.config.target_columns())?;
        self.apply_overrides(&mut descriptor)?;
        Ok(descriptor)
    }

    async fn clean(&self, data: DataFrame) -> Result<CleanedData> {
        let descriptor = self.profile(&data).await?;
        let task_type = descriptor.infer_task_type();
        tracing::info!(
            "Profiled {} columns, task type {}, {} duplicate row(s)",
            descriptor.columns_info.len(),
            task_type,
            descriptor.duplicate_rows.len()
        );

        let cleaning = self.config.cleaning_strategy();
        cleaning.validate()?;
        let is_imbalanced = descriptor.is_imbalance(cleaning.imbalance_handling_strategy.threshold);
        let (frame, report) = Cleaner::new(cleaning.clone()).clean(&data, &descriptor)?;
        if frame.n_rows() == 0 {
            return Err(AutoMlError::processing("Cleaning removed every row"));
        }

        Ok(CleanedData {
            descriptor,
            task_type,
            is_imbalanced,
            report,
            frame,
        })
    }

    async fn preprocess(&self, cleaned: CleanedData) -> Result<RunResult> {
        let prepared = Preprocessor::new(self.config.preprocessing_strategy().clone())
            .run(&cleaned.frame, &cleaned.descriptor)?;

        Ok(RunResult {
            descriptor: cleaned.descriptor,
            task_type: cleaned.task_type,
            is_imbalanced: cleaned.is_imbalanced,
            cleaning: cleaned.report,
            cleaned: cleaned.frame,
            prepared: prepared.frame,
            preprocessing_steps: prepared.steps,
            feature_names: prepared.feature_names,
        })
    }

    async fn load(&self, result: RunResult) -> Result<String> {
        let output_path = self.bundle_path();
        let include_cleaned = self.config.include_cleaned();

        tracing::debug!(
            "Creating ZIP bundle with {} files",
            3 + if include_cleaned { 1 } else { 0 }
        );

        let summary = result.summary(self.config.project_name(), ProjectStatus::Preprocessing);
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("descriptor.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&result.descriptor)?.as_bytes())?;

            zip.start_file::<_, ()>("report.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&summary)?.as_bytes())?;

            zip.start_file::<_, ()>("prepared.csv", FileOptions::default())?;
            zip.write_all(&write_csv(&result.prepared)?)?;

            if include_cleaned {
                zip.start_file::<_, ()>("cleaned.csv", FileOptions::default())?;
                zip.write_all(&write_csv(&result.cleaned)?)?;
            }

            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&output_path, &zip_data).await?;
        Ok(output_path)
    }
}
