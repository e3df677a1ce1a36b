pub mod config;
pub mod core;
pub mod domain;
pub mod frame;
pub mod schema;
pub mod transformer;
pub mod utils;

pub use config::{cli::LocalStorage, AutoMlConfig};
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::core::{
    cleaning::{Cleaner, CleaningReport},
    engine::AutoMlEngine,
    pipeline::{AutoMlPipeline, DatasetSource},
    preprocessing::{Prepared, Preprocessor},
};
pub use frame::DataFrame;
pub use schema::{DatasetDescriptor, TaskType};
pub use utils::error::{AutoMlError, Result};
