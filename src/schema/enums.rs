use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Implemented by enums that travel as fixed strings in configs and reports.
pub trait WireEnum: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;
}

/// Wire names accepted for `T`, in declaration order.
pub fn valid_values<T: WireEnum>() -> Vec<&'static str> {
    T::ALL.iter().map(WireEnum::as_str).collect()
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl WireEnum for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        format!(
                            "unknown {} '{}', expected one of: {}",
                            stringify!($name),
                            s,
                            valid_values::<Self>().join(", ")
                        )
                    })
            }
        }
    };
}

wire_enum!(
    /// Storage type of a column.
    Dtype {
        Integer => "integer",
        Float => "float",
        Boolean => "bool",
        Categorical => "categorical",
        Date => "date",
    }
);

impl Dtype {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Dtype::Integer | Dtype::Float)
    }

    /// One-letter prefix used when building row keys.
    pub(crate) fn tag(&self) -> char {
        match self {
            Dtype::Integer => 'i',
            Dtype::Float => 'f',
            Dtype::Boolean => 'b',
            Dtype::Categorical => 's',
            Dtype::Date => 'd',
        }
    }
}

wire_enum!(
    /// Role a column plays in the dataset.
    ColumnType {
        Features => "features",
        Target => "target",
        Index => "index",
        UniqueId => "unique-id",
    }
);

wire_enum!(
    FeatureType {
        Ordinal => "Ordinal",
        Nominal => "Nominal",
        Continuous => "Continuous",
        Constant => "constant",
    }
);

wire_enum!(
    ImputationScheme {
        Mean => "mean",
        Median => "median",
        Mode => "mode",
        Value => "value",
    }
);

wire_enum!(
    OutlierDetectingScheme {
        ZScore => "Z_Score",
        Iqr => "IQR",
    }
);

wire_enum!(
    /// Resampling applied to an imbalanced classification target.
    SamplingScheme {
        None => "none",
        Over => "over",
        Under => "under",
    }
);

wire_enum!(
    /// Lifecycle stage of a project run.
    ProjectStatus {
        Init => "INIT",
        DataLoad => "DATALOAD",
        VisualizationPre => "VISULIZATION",
        Cleaning => "CLEANING",
        Preprocessing => "PREPROCESSING",
        VisualizationPost => "VISULIZATION_POST",
        Modeling => "MODELING",
        Analytics => "ANALYTICS",
        Testing => "TESTING",
        Deployment => "DEPLOYMENT",
    }
);

impl ProjectStatus {
    /// Stage that follows this one; `Deployment` is terminal.
    pub fn next(&self) -> Option<ProjectStatus> {
        let idx = Self::ALL.iter().position(|s| s == self)?;
        Self::ALL.get(idx + 1).copied()
    }
}

wire_enum!(
    TaskType {
        RegressionSingleTarget => "REGRESSION_SINGLE_TARGET",
        RegressionMultipleTarget => "REGRESSION_MULTIPLE_TARGET",
        ClassificationSingleTargetBinaryClass => "CLASSIFICATION_SINGLE_TARGET_BINARY_CLASS",
        ClassificationSingleTargetMultiClass => "CLASSIFICATION_SINGLE_TARGET_MULTI_CLASS",
        ClassificationMultipleTarget => "CLASSIFICATION_MULTIPLE_TARGET",
        Clustering => "CLUSTERING",
        ForecastingSingleSeries => "FORECASTING_SINGLE_SERIES",
        ForecastingMultipleSeries => "FORECASTING_MULTIPLE_SERIES",
    }
);

impl TaskType {
    pub fn is_classification(&self) -> bool {
        matches!(
            self,
            TaskType::ClassificationSingleTargetBinaryClass
                | TaskType::ClassificationSingleTargetMultiClass
                | TaskType::ClassificationMultipleTarget
        )
    }
}

wire_enum!(
    /// Model explanation techniques offered after modeling.
    Explainer {
        FeatureImportance => "FEATURE_IMPORTANCE",
        PermutationImportance => "PERMUTACENCE_IMPORTANCE",
        ShapLocalImportance => "SHAP_LOCAL_IMPORTANCEs",
        ShapGlobalImportance => "SHAP_GLOBAL_IMPORTANCE",
        LimeImportance => "LIME_IMPORTANCE",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_values_follow_declaration_order() {
        assert_eq!(
            valid_values::<ImputationScheme>(),
            vec!["mean", "median", "mode", "value"]
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&ColumnType::UniqueId).unwrap();
        assert_eq!(json, "\"unique-id\"");
        let scheme: OutlierDetectingScheme = serde_json::from_str("\"IQR\"").unwrap();
        assert_eq!(scheme, OutlierDetectingScheme::Iqr);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Z_SCORE".parse::<OutlierDetectingScheme>(), Ok(OutlierDetectingScheme::ZScore));
        let err = "bogus".parse::<Dtype>().unwrap_err();
        assert!(err.contains("integer, float, bool, categorical, date"));
    }

    #[test]
    fn test_project_status_progression() {
        assert_eq!(ProjectStatus::Init.next(), Some(ProjectStatus::DataLoad));
        assert_eq!(ProjectStatus::Cleaning.next(), Some(ProjectStatus::Preprocessing));
        assert_eq!(ProjectStatus::Deployment.next(), None);
    }
}
