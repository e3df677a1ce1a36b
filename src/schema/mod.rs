pub mod descriptors;
pub mod enums;
pub mod stats;
pub mod strategy;

pub use descriptors::{ColumnDescriptor, DatasetDescriptor};
pub use enums::{
    ColumnType, Dtype, Explainer, FeatureType, ImputationScheme, OutlierDetectingScheme,
    ProjectStatus, SamplingScheme, TaskType,
};
pub use strategy::{
    CleaningStrategy, ImbalanceStrategy, NaStrategy, OutlierStrategy, PreprocessingStrategy,
    TargetDistribution, TargetStat,
};
