use crate::frame::Scalar;
use crate::schema::enums::{ImputationScheme, OutlierDetectingScheme, SamplingScheme};
use crate::utils::error::{AutoMlError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_imbalance_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaStrategy {
    #[serde(default)]
    pub drop_na: bool,
    #[serde(default = "NaStrategy::default_scheme")]
    pub imputation_scheme: ImputationScheme,
    #[serde(default)]
    pub imputation_value: Option<Scalar>,
}

impl NaStrategy {
    fn default_scheme() -> ImputationScheme {
        ImputationScheme::Median
    }
}

impl Default for NaStrategy {
    fn default() -> Self {
        Self {
            drop_na: false,
            imputation_scheme: Self::default_scheme(),
            imputation_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceStrategy {
    #[serde(default = "ImbalanceStrategy::default_sampling")]
    pub sampling: SamplingScheme,
    /// Minority/majority ratio below which a target counts as imbalanced.
    #[serde(default = "default_imbalance_threshold")]
    pub threshold: f64,
}

impl ImbalanceStrategy {
    fn default_sampling() -> SamplingScheme {
        SamplingScheme::None
    }
}

impl Default for ImbalanceStrategy {
    fn default() -> Self {
        Self {
            sampling: Self::default_sampling(),
            threshold: default_imbalance_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierStrategy {
    #[serde(default = "OutlierStrategy::default_scheme")]
    pub detection_scheme: OutlierDetectingScheme,
    #[serde(default)]
    pub drop_outlier: bool,
}

impl OutlierStrategy {
    fn default_scheme() -> OutlierDetectingScheme {
        OutlierDetectingScheme::Iqr
    }
}

impl Default for OutlierStrategy {
    fn default() -> Self {
        Self {
            detection_scheme: Self::default_scheme(),
            drop_outlier: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CleaningStrategy {
    #[serde(default)]
    pub drop_duplicate_rows: bool,
    #[serde(default)]
    pub drop_duplicate_column: bool,
    #[serde(default)]
    pub rename_duplicate_columns: bool,
    #[serde(default)]
    pub na_handling_strategy: NaStrategy,
    #[serde(default)]
    pub outlier_handling_strategy: OutlierStrategy,
    #[serde(default)]
    pub imbalance_handling_strategy: ImbalanceStrategy,
}

impl Validate for CleaningStrategy {
    fn validate(&self) -> Result<()> {
        if self.drop_duplicate_column && self.rename_duplicate_columns {
            return Err(AutoMlError::ConfigValidationError {
                field: "cleaning".to_string(),
                message: "drop_duplicate_column and rename_duplicate_columns are mutually exclusive"
                    .to_string(),
            });
        }
        let na = &self.na_handling_strategy;
        if na.imputation_scheme == ImputationScheme::Value && na.imputation_value.is_none() {
            return Err(AutoMlError::MissingConfigError {
                field: "cleaning.na_handling_strategy.imputation_value".to_string(),
            });
        }
        let threshold = self.imbalance_handling_strategy.threshold;
        if threshold <= 0.0 {
            return Err(AutoMlError::InvalidConfigValueError {
                field: "cleaning.imbalance_handling_strategy.threshold".to_string(),
                value: threshold.to_string(),
                reason: "Threshold must be greater than 0".to_string(),
            });
        }
        validate_range(
            "cleaning.imbalance_handling_strategy.threshold",
            threshold,
            0.0,
            1.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreprocessingStrategy {
    #[serde(default)]
    pub transform_binary_column: bool,
    #[serde(default)]
    pub remove_datetime_column: bool,
    #[serde(default)]
    pub split_datetime_column: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetDistribution {
    /// Count per class label.
    Classes { counts: BTreeMap<String, usize> },
    Continuous {
        min: Option<f64>,
        max: Option<f64>,
        mean: Option<f64>,
        std_dev: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetStat {
    pub column: String,
    pub distribution: TargetDistribution,
}

impl TargetStat {
    pub fn class_counts(&self) -> Option<&BTreeMap<String, usize>> {
        match &self.distribution {
            TargetDistribution::Classes { counts } => Some(counts),
            TargetDistribution::Continuous { .. } => None,
        }
    }

    pub fn is_classification(&self) -> bool {
        self.class_counts().is_some()
    }

    /// Minority over majority class count; `None` for continuous targets.
    pub fn imbalance_ratio(&self) -> Option<f64> {
        let counts = self.class_counts()?;
        let majority = *counts.values().max()?;
        let minority = *counts.values().min()?;
        if majority == 0 {
            return None;
        }
        Some(minority as f64 / majority as f64)
    }
}
