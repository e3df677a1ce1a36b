pub mod cleaning;
pub mod engine;
pub mod pipeline;
pub mod preprocessing;

pub use crate::domain::model::{CleanedData, ColumnOverride, RunResult, RunSummary};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
