use crate::domain::model::{CleanedData, ColumnOverride, RunResult};
use crate::frame::{CsvOptions, DataFrame};
use crate::schema::{CleaningStrategy, DatasetDescriptor, PreprocessingStrategy};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn project_name(&self) -> &str;
    /// Local path (relative to storage) or http(s) URL of the dataset.
    fn dataset_source(&self) -> &str;
    fn target_columns(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn bundle_name(&self) -> &str;
    fn include_cleaned(&self) -> bool;
    fn csv_options(&self) -> &CsvOptions;
    fn column_overrides(&self) -> &[ColumnOverride];
    fn cleaning_strategy(&self) -> &CleaningStrategy;
    fn preprocessing_strategy(&self) -> &PreprocessingStrategy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<DataFrame>;
    async fn profile(&self, data: &DataFrame) -> Result<DatasetDescriptor>;
    async fn clean(&self, data: DataFrame) -> Result<CleanedData>;
    async fn preprocess(&self, cleaned: CleanedData) -> Result<RunResult>;
    async fn load(&self, result: RunResult) -> Result<String>;

    /// Cleaning followed by preprocessing.
    async fn transform(&self, data: DataFrame) -> Result<RunResult> {
        let cleaned = self.clean(data).await?;
        self.preprocess(cleaned).await
    }
}
