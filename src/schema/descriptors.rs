use crate::frame::{Column, ColumnData, DataFrame, Scalar};
use crate::schema::enums::{
    ColumnType, Dtype, FeatureType, ImputationScheme, OutlierDetectingScheme, TaskType,
};
use crate::schema::stats;
use crate::schema::strategy::{TargetDistribution, TargetStat};
use crate::utils::error::{AutoMlError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Integer targets with at most this many distinct values are treated as class labels.
pub const MAX_INTEGER_CLASSES: usize = 10;

/// Default minority/majority ratio used by [`DatasetDescriptor::is_imbalanced`].
pub const DEFAULT_IMBALANCE_THRESHOLD: f64 = 0.5;

fn default_selected() -> bool {
    true
}

/// Profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(default = "ColumnDescriptor::default_col_type")]
    pub col_type: ColumnType,
    pub dtype: Dtype,
    pub feature_type: FeatureType,
    /// Non-null values.
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mode: Option<Scalar>,
    #[serde(default)]
    pub null_count: usize,
    #[serde(default)]
    pub unique_values: usize,
    pub imputation_scheme: Option<ImputationScheme>,
    pub imputation_value: Option<Scalar>,
    #[serde(default = "default_selected")]
    pub is_selected: bool,
}

impl ColumnDescriptor {
    fn default_col_type() -> ColumnType {
        ColumnType::Features
    }

    pub fn build_from_column<S: AsRef<str>>(column: &Column, target_columns: &[S]) -> Result<Self> {
        let data = &column.data;
        let mut numeric = NumericSummary::default();
        let (feature_type, mode) = match data {
            ColumnData::Integer(_) | ColumnData::Float(_) => {
                let values = data.numeric_values().unwrap_or_default();
                numeric = NumericSummary::from_values(&values);
                (FeatureType::Continuous, data.mode())
            }
            ColumnData::Categorical(_) | ColumnData::Boolean(_) => (FeatureType::Ordinal, data.mode()),
            ColumnData::Date(_) => (FeatureType::Nominal, None),
        };

        let is_target = target_columns.iter().any(|t| t.as_ref() == column.name);
        let col_type = if is_target {
            ColumnType::Target
        } else {
            ColumnType::Features
        };

        let unique_values = data.unique_count();
        let feature_type = if unique_values == 1 {
            if is_target {
                return Err(AutoMlError::ConstantTarget {
                    column: column.name.clone(),
                });
            }
            FeatureType::Constant
        } else {
            feature_type
        };

        Ok(Self {
            name: column.name.clone(),
            col_type,
            dtype: data.dtype(),
            feature_type,
            count: data.count(),
            mean: numeric.mean,
            median: numeric.median,
            std_dev: numeric.std_dev,
            min: numeric.min,
            max: numeric.max,
            mode,
            null_count: data.null_count(),
            unique_values,
            imputation_scheme: None,
            imputation_value: None,
            is_selected: true,
        })
    }

    /// Sets the imputation settings and checks them against the dtype.
    pub fn with_imputation(mut self, scheme: ImputationScheme, value: Option<Scalar>) -> Result<Self> {
        self.imputation_scheme = Some(scheme);
        self.imputation_value = value;
        self.validate()?;
        Ok(self)
    }

    pub fn is_target(&self) -> bool {
        self.col_type == ColumnType::Target
    }

    fn invalid_imputation(&self, what: String) -> AutoMlError {
        AutoMlError::InvalidImputation {
            column: self.name.clone(),
            dtype: self.dtype.to_string(),
            what,
        }
    }
}

/// Whether `scheme` can fill nulls of `dtype`.
pub fn scheme_supports(dtype: Dtype, scheme: ImputationScheme) -> bool {
    match scheme {
        ImputationScheme::Mean | ImputationScheme::Median => dtype.is_numeric(),
        ImputationScheme::Mode => dtype != Dtype::Integer && dtype != Dtype::Float,
        ImputationScheme::Value => true,
    }
}

/// Whether `value` is an acceptable fill constant for `dtype`.
pub fn value_supports(dtype: Dtype, value: &Scalar) -> bool {
    match dtype {
        Dtype::Integer | Dtype::Float => value.is_numeric(),
        Dtype::Categorical => matches!(value, Scalar::Str(_)),
        Dtype::Boolean => matches!(value, Scalar::Bool(_)),
        Dtype::Date => value.as_datetime().is_some(),
    }
}

impl Validate for ColumnDescriptor {
    fn validate(&self) -> Result<()> {
        let Some(scheme) = self.imputation_scheme else {
            return Ok(());
        };
        if !scheme_supports(self.dtype, scheme) {
            return Err(self.invalid_imputation(format!("imputation_scheme {}", scheme)));
        }
        if scheme == ImputationScheme::Value {
            match &self.imputation_value {
                Some(value) if value_supports(self.dtype, value) => {}
                Some(value) => {
                    return Err(self.invalid_imputation(format!("imputation_value {}", value)))
                }
                None => return Err(self.invalid_imputation("imputation_value <none>".to_string())),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct NumericSummary {
    mean: Option<f64>,
    median: Option<f64>,
    std_dev: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumericSummary {
    fn from_values(values: &[f64]) -> Self {
        Self {
            mean: stats::mean(values),
            median: stats::median(values),
            std_dev: stats::std_dev(values),
            min: stats::min(values),
            max: stats::max(values),
        }
    }
}

/// Profile of a whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    #[serde(default)]
    pub row_count: usize,
    pub columns_info: Vec<ColumnDescriptor>,
    /// Rows identical to an earlier row.
    #[serde(default)]
    pub duplicate_rows: Vec<usize>,
    /// One entry per repeated occurrence of a column name.
    #[serde(default)]
    pub duplicate_columns: Vec<String>,
    #[serde(default)]
    pub targets: Vec<TargetStat>,
}

impl DatasetDescriptor {
    pub fn build_from_dataset<S: AsRef<str>>(dataset: &DataFrame, target_columns: &[S]) -> Result<Self> {
        if dataset.is_empty() {
            return Err(AutoMlError::EmptyFrame);
        }
        let missing = dataset.missing_columns(target_columns);
        if !missing.is_empty() {
            return Err(AutoMlError::column_not_found(missing));
        }

        let (row_count, col_count) = dataset.shape();
        tracing::debug!("Profiling dataset with {} rows and {} columns", row_count, col_count);

        let mut seen_rows = HashSet::new();
        let duplicate_rows = (0..row_count)
            .filter(|&row| !seen_rows.insert(dataset.row_key(row)))
            .collect();

        let mut seen_names = HashSet::new();
        let duplicate_columns = dataset
            .column_names()
            .into_iter()
            .filter(|name| !seen_names.insert(name.clone()))
            .collect();

        let columns_info = dataset
            .columns()
            .iter()
            .map(|column| ColumnDescriptor::build_from_column(column, target_columns))
            .collect::<Result<Vec<_>>>()?;

        let mut targets = Vec::new();
        let mut seen_targets = HashSet::new();
        for name in target_columns.iter().map(|t| t.as_ref()) {
            if !seen_targets.insert(name) {
                continue;
            }
            if let Some(column) = dataset.column(name) {
                targets.push(target_stat(column));
            }
        }

        Ok(Self {
            row_count,
            columns_info,
            duplicate_rows,
            duplicate_columns,
            targets,
        })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns_info.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnDescriptor> {
        self.columns_info.iter_mut().find(|c| c.name == name)
    }

    pub fn target_names(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.column.as_str()).collect()
    }

    /// Names of feature columns still selected for modelling.
    pub fn selected_features(&self) -> Vec<&str> {
        self.columns_info
            .iter()
            .filter(|c| c.col_type == ColumnType::Features && c.is_selected)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Rows holding at least one outlier in a selected continuous feature.
    pub fn outlier_rows(&self, dataset: &DataFrame, scheme: OutlierDetectingScheme) -> Vec<usize> {
        let mut rows = BTreeSet::new();
        let candidates: BTreeSet<&str> = self
            .columns_info
            .iter()
            .filter(|c| {
                c.col_type == ColumnType::Features
                    && c.is_selected
                    && c.feature_type == FeatureType::Continuous
            })
            .map(|c| c.name.as_str())
            .collect();

        for name in candidates {
            let Some(column) = dataset.column(name) else {
                continue;
            };
            let Some(values) = column.data.numeric_values() else {
                continue;
            };
            let Some((low, high)) = stats::outlier_bounds(&values, scheme) else {
                continue;
            };
            for row in 0..column.len() {
                if let Some(v) = column.data.get(row).and_then(|s| s.as_f64()) {
                    if v < low || v > high {
                        rows.insert(row);
                    }
                }
            }
        }
        rows.into_iter().collect()
    }

    pub fn outlier_count(&self, dataset: &DataFrame, scheme: OutlierDetectingScheme) -> usize {
        self.outlier_rows(dataset, scheme).len()
    }

    /// True when a classification target's minority/majority ratio is below `threshold`.
    pub fn is_imbalance(&self, threshold: f64) -> bool {
        self.targets
            .iter()
            .filter_map(TargetStat::imbalance_ratio)
            .any(|ratio| ratio < threshold)
    }

    pub fn is_imbalanced(&self) -> bool {
        self.is_imbalance(DEFAULT_IMBALANCE_THRESHOLD)
    }

    pub fn target_statistics(&self) -> &[TargetStat] {
        &self.targets
    }

    pub fn infer_task_type(&self) -> TaskType {
        match self.targets.as_slice() {
            [] => TaskType::Clustering,
            [single] => match single.class_counts() {
                Some(counts) if counts.len() <= 2 => TaskType::ClassificationSingleTargetBinaryClass,
                Some(_) => TaskType::ClassificationSingleTargetMultiClass,
                None => TaskType::RegressionSingleTarget,
            },
            many if many.iter().all(TargetStat::is_classification) => {
                TaskType::ClassificationMultipleTarget
            }
            _ => TaskType::RegressionMultipleTarget,
        }
    }
}

fn target_stat(column: &Column) -> TargetStat {
    let as_classes = match column.dtype() {
        Dtype::Integer => column.data.unique_count() <= MAX_INTEGER_CLASSES,
        Dtype::Float | Dtype::Date => false,
        Dtype::Boolean | Dtype::Categorical => true,
    };

    let distribution = if as_classes {
        let mut counts = BTreeMap::new();
        for row in 0..column.len() {
            if let Some(label) = column.data.get(row) {
                *counts.entry(label.to_string()).or_insert(0) += 1;
            }
        }
        TargetDistribution::Classes { counts }
    } else {
        let values = column.data.numeric_values().unwrap_or_default();
        TargetDistribution::Continuous {
            min: stats::min(&values),
            max: stats::max(&values),
            mean: stats::mean(&values),
            std_dev: stats::std_dev(&values),
        }
    };

    TargetStat {
        column: column.name.clone(),
        distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> DataFrame {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        DataFrame::new(vec![
            Column::integer("age", vec![Some(20), Some(30), None, Some(30), Some(20)]),
            Column::categorical("city", vec![Some("Oslo"), Some("Rome"), Some("Oslo"), Some("Rome"), Some("Oslo")]),
            Column::integer("const", vec![Some(1); 5]),
            Column::date("joined", vec![Some(day); 5]),
            Column::categorical("Class", vec![Some("yes"), Some("no"), Some("yes"), Some("no"), Some("yes")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_numeric_column_stats() {
        let frame = sample();
        let desc = ColumnDescriptor::build_from_column(frame.column("age").unwrap(), &["Class"]).unwrap();
        assert_eq!(desc.dtype, Dtype::Integer);
        assert_eq!(desc.feature_type, FeatureType::Continuous);
        assert_eq!(desc.col_type, ColumnType::Features);
        assert_eq!(desc.count, 4);
        assert_eq!(desc.null_count, 1);
        assert_eq!(desc.unique_values, 2);
        assert_eq!(desc.mean, Some(25.0));
        assert_eq!(desc.median, Some(25.0));
        assert_eq!(desc.mode, Some(Scalar::Int(20)));
    }

    #[test]
    fn test_feature_types_by_dtype() {
        let frame = sample();
        let desc = DatasetDescriptor::build_from_dataset(&frame, &["Class"]).unwrap();
        let kinds: Vec<FeatureType> = desc.columns_info.iter().map(|c| c.feature_type).collect();
        assert_eq!(
            kinds,
            vec![
                FeatureType::Continuous,
                FeatureType::Ordinal,
                FeatureType::Constant,
                FeatureType::Constant,
                FeatureType::Ordinal
            ]
        );
        assert!(desc.column("Class").unwrap().is_target());
        assert_eq!(desc.column("joined").unwrap().mode, None);
    }

    #[test]
    fn test_constant_target_is_rejected() {
        let frame = sample();
        let err = DatasetDescriptor::build_from_dataset(&frame, &["const"]).unwrap_err();
        assert!(matches!(err, AutoMlError::ConstantTarget { column } if column == "const"));
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let frame = sample();
        let err = DatasetDescriptor::build_from_dataset(&frame, &["label"]).unwrap_err();
        assert!(matches!(err, AutoMlError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let frame = DataFrame::default();
        let err = DatasetDescriptor::build_from_dataset::<&str>(&frame, &[]).unwrap_err();
        assert!(matches!(err, AutoMlError::EmptyFrame));
    }

    #[test]
    fn test_duplicate_rows_and_columns() {
        let frame = DataFrame::new(vec![
            Column::integer("a", vec![Some(1), Some(2), Some(1), Some(1)]),
            Column::integer("a", vec![Some(5), Some(6), Some(5), Some(7)]),
            Column::integer("b", vec![Some(0), Some(1), Some(0), Some(0)]),
        ])
        .unwrap();
        let desc = DatasetDescriptor::build_from_dataset::<&str>(&frame, &[]).unwrap();
        assert_eq!(desc.row_count, 4);
        assert_eq!(desc.duplicate_rows, vec![2]);
        assert_eq!(desc.duplicate_columns, vec!["a"]);
        assert_eq!(desc.columns_info.len(), 3);
    }

    #[test]
    fn test_imputation_rules() {
        let frame = sample();
        let age = ColumnDescriptor::build_from_column(frame.column("age").unwrap(), &["Class"]).unwrap();
        assert!(age.clone().with_imputation(ImputationScheme::Mean, None).is_ok());
        assert!(age.clone().with_imputation(ImputationScheme::Mode, None).is_err());
        assert!(age
            .clone()
            .with_imputation(ImputationScheme::Value, Some(Scalar::Str("x".into())))
            .is_err());
        assert!(age
            .with_imputation(ImputationScheme::Value, Some(Scalar::Float(1.5)))
            .is_ok());

        let city = ColumnDescriptor::build_from_column(frame.column("city").unwrap(), &["Class"]).unwrap();
        assert!(city.clone().with_imputation(ImputationScheme::Median, None).is_err());
        assert!(city.clone().with_imputation(ImputationScheme::Mode, None).is_ok());
        assert!(city
            .with_imputation(ImputationScheme::Value, Some(Scalar::Int(3)))
            .is_err());

        let joined = ColumnDescriptor::build_from_column(frame.column("joined").unwrap(), &["Class"]).unwrap();
        assert!(joined
            .clone()
            .with_imputation(ImputationScheme::Value, Some(Scalar::Str("2024-05-01".into())))
            .is_ok());
        assert!(joined
            .with_imputation(ImputationScheme::Mean, None)
            .is_err());
    }

    #[test]
    fn test_task_type_inference() {
        let frame = sample();
        let binary = DatasetDescriptor::build_from_dataset(&frame, &["Class"]).unwrap();
        assert_eq!(binary.infer_task_type(), TaskType::ClassificationSingleTargetBinaryClass);

        let none = DatasetDescriptor::build_from_dataset::<&str>(&frame, &[]).unwrap();
        assert_eq!(none.infer_task_type(), TaskType::Clustering);

        let regression_frame = DataFrame::new(vec![
            Column::float("y", (0..20).map(|i| Some(i as f64 * 0.5)).collect()),
            Column::integer("x", (0..20).map(Some).collect()),
        ])
        .unwrap();
        let regression = DatasetDescriptor::build_from_dataset(&regression_frame, &["y"]).unwrap();
        assert_eq!(regression.infer_task_type(), TaskType::RegressionSingleTarget);

        let multi = DatasetDescriptor::build_from_dataset(&regression_frame, &["y", "x"]).unwrap();
        assert_eq!(multi.infer_task_type(), TaskType::RegressionMultipleTarget);
    }

    #[test]
    fn test_multi_class_and_multiple_class_targets() {
        let frame = DataFrame::new(vec![
            Column::categorical(
                "species",
                vec![Some("setosa"), Some("versicolor"), Some("virginica"), Some("setosa"), Some("virginica")],
            ),
            Column::integer("grade", vec![Some(1), Some(2), Some(1), Some(2), Some(2)]),
            Column::boolean("flag", vec![Some(true), Some(false), Some(true), Some(true), Some(false)]),
        ])
        .unwrap();

        let species = DatasetDescriptor::build_from_dataset(&frame, &["species"]).unwrap();
        assert_eq!(species.target_statistics()[0].class_counts().map(|c| c.len()), Some(3));
        assert_eq!(species.infer_task_type(), TaskType::ClassificationSingleTargetMultiClass);

        let both = DatasetDescriptor::build_from_dataset(&frame, &["grade", "flag"]).unwrap();
        assert!(both.target_statistics().iter().all(TargetStat::is_classification));
        assert_eq!(both.infer_task_type(), TaskType::ClassificationMultipleTarget);

        // a continuous target among the class targets makes it regression
        let mixed_frame = DataFrame::new(vec![
            Column::categorical("species", vec![Some("a"), Some("b"), Some("a")]),
            Column::float("weight", vec![Some(1.5), Some(2.25), Some(3.0)]),
        ])
        .unwrap();
        let mixed = DatasetDescriptor::build_from_dataset(&mixed_frame, &["species", "weight"]).unwrap();
        assert_eq!(mixed.infer_task_type(), TaskType::RegressionMultipleTarget);
    }

    #[test]
    fn test_date_target_is_not_a_class_label() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let days: Vec<_> = (0..20)
            .map(|i| {
                start
                    .checked_add_days(chrono::Days::new(i))
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .collect();
        let frame = DataFrame::new(vec![
            Column::date("t", days),
            Column::integer("x", (0..20).map(Some).collect()),
        ])
        .unwrap();

        let desc = DatasetDescriptor::build_from_dataset(&frame, &["t"]).unwrap();
        assert!(!desc.target_statistics()[0].is_classification());
        assert_eq!(desc.infer_task_type(), TaskType::RegressionSingleTarget);
        assert!(!desc.is_imbalanced());
    }

    #[test]
    fn test_imbalance_detection() {
        let labels: Vec<Option<i64>> = [0, 0, 0, 0, 0, 0, 0, 0, 1, 1].iter().map(|v| Some(*v)).collect();
        let frame = DataFrame::new(vec![
            Column::integer("label", labels),
            Column::float("x", (0..10).map(|i| Some(i as f64)).collect()),
        ])
        .unwrap();
        let desc = DatasetDescriptor::build_from_dataset(&frame, &["label"]).unwrap();
        let stat = &desc.target_statistics()[0];
        assert_eq!(stat.class_counts().unwrap().get("0"), Some(&8));
        assert!(desc.is_imbalanced());
        assert!(!desc.is_imbalance(0.2));
    }

    #[test]
    fn test_outlier_count() {
        let mut values: Vec<Option<f64>> = (0..20).map(|i| Some(10.0 + (i % 5) as f64)).collect();
        values.push(Some(500.0));
        let frame = DataFrame::new(vec![
            Column::float("x", values),
            Column::categorical("c", (0..21).map(|i| Some(if i % 2 == 0 { "a" } else { "b" })).collect()),
        ])
        .unwrap();
        let desc = DatasetDescriptor::build_from_dataset::<&str>(&frame, &[]).unwrap();
        assert_eq!(desc.outlier_count(&frame, OutlierDetectingScheme::Iqr), 1);
        assert_eq!(desc.outlier_rows(&frame, OutlierDetectingScheme::ZScore), vec![20]);
    }

    #[test]
    fn test_descriptor_serializes_wire_names() {
        let frame = sample();
        let desc = DatasetDescriptor::build_from_dataset(&frame, &["Class"]).unwrap();
        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["columns_info"][0]["dtype"], "integer");
        assert_eq!(json["columns_info"][4]["col_type"], "target");
        assert_eq!(json["targets"][0]["distribution"]["kind"], "classes");
    }
}
