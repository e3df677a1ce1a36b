use crate::frame::{Column, DataFrame, Scalar};
use crate::schema::descriptors::{scheme_supports, value_supports};
use crate::schema::enums::{Dtype, ImputationScheme, SamplingScheme};
use crate::schema::stats;
use crate::schema::{CleaningStrategy, ColumnDescriptor, DatasetDescriptor};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenamedColumn {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampleReport {
    pub scheme: SamplingScheme,
    pub target: String,
    pub before: BTreeMap<String, usize>,
    pub after: BTreeMap<String, usize>,
}

/// What the cleaning stage changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub dropped_duplicate_columns: Vec<String>,
    pub renamed_columns: Vec<RenamedColumn>,
    pub dropped_duplicate_rows: usize,
    pub dropped_null_target_rows: usize,
    pub dropped_na_rows: usize,
    /// Filled cells per column.
    pub imputed: BTreeMap<String, usize>,
    /// Columns that still hold missing values.
    pub unimputed_columns: Vec<String>,
    pub outlier_rows: usize,
    pub dropped_outlier_rows: usize,
    pub resampled: Option<ResampleReport>,
}

/// Applies a [`CleaningStrategy`] to a dataset profiled by a [`DatasetDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    strategy: CleaningStrategy,
}

fn without_rows(frame: &DataFrame, drop: &HashSet<usize>) -> DataFrame {
    let keep: Vec<usize> = (0..frame.n_rows()).filter(|r| !drop.contains(r)).collect();
    frame.take_rows(&keep)
}

fn class_rows(column: &Column) -> BTreeMap<String, Vec<usize>> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for row in 0..column.len() {
        if let Some(label) = column.data.get(row) {
            groups.entry(label.to_string()).or_default().push(row);
        }
    }
    groups
}

fn class_counts(groups: &BTreeMap<String, Vec<usize>>) -> BTreeMap<String, usize> {
    groups.iter().map(|(k, v)| (k.clone(), v.len())).collect()
}

impl Cleaner {
    pub fn new(strategy: CleaningStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &CleaningStrategy {
        &self.strategy
    }

    pub fn clean(
        &self,
        frame: &DataFrame,
        descriptor: &DatasetDescriptor,
    ) -> Result<(DataFrame, CleaningReport)> {
        let mut report = CleaningReport {
            rows_before: frame.n_rows(),
            ..CleaningReport::default()
        };
        let mut frame = frame.clone();

        self.handle_duplicate_columns(&mut frame, &mut report);

        if self.strategy.drop_duplicate_rows {
            let mut seen = HashSet::new();
            let dupes: HashSet<usize> = (0..frame.n_rows())
                .filter(|&row| !seen.insert(frame.row_key(row)))
                .collect();
            report.dropped_duplicate_rows = dupes.len();
            frame = without_rows(&frame, &dupes);
        }

        frame = self.handle_missing(frame, descriptor, &mut report)?;

        let outliers = descriptor.outlier_rows(
            &frame,
            self.strategy.outlier_handling_strategy.detection_scheme,
        );
        report.outlier_rows = outliers.len();
        if self.strategy.outlier_handling_strategy.drop_outlier && !outliers.is_empty() {
            report.dropped_outlier_rows = outliers.len();
            frame = without_rows(&frame, &outliers.into_iter().collect());
        }

        frame = self.handle_imbalance(frame, descriptor, &mut report);

        report.rows_after = frame.n_rows();
        tracing::info!(
            "Cleaning kept {} of {} rows ({} duplicates, {} with missing values, {} outliers dropped)",
            report.rows_after,
            report.rows_before,
            report.dropped_duplicate_rows,
            report.dropped_na_rows + report.dropped_null_target_rows,
            report.dropped_outlier_rows
        );
        Ok((frame, report))
    }

    fn handle_duplicate_columns(&self, frame: &mut DataFrame, report: &mut CleaningReport) {
        if self.strategy.drop_duplicate_column {
            let mut seen = HashSet::new();
            let mut dropped = Vec::new();
            frame.retain_columns(|_, column| {
                let first = seen.insert(column.name.clone());
                if !first {
                    dropped.push(column.name.clone());
                }
                first
            });
            report.dropped_duplicate_columns = dropped;
        } else if self.strategy.rename_duplicate_columns {
            let mut taken: HashSet<String> = frame.column_names().into_iter().collect();
            let mut occurrences: HashMap<String, usize> = HashMap::new();
            for column in frame.columns_mut() {
                let seen = occurrences.entry(column.name.clone()).or_insert(0);
                *seen += 1;
                if *seen == 1 {
                    continue;
                }
                let mut suffix = *seen - 1;
                let mut candidate = format!("{}.{}", column.name, suffix);
                while taken.contains(&candidate) {
                    suffix += 1;
                    candidate = format!("{}.{}", column.name, suffix);
                }
                taken.insert(candidate.clone());
                report.renamed_columns.push(RenamedColumn {
                    from: column.name.clone(),
                    to: candidate.clone(),
                });
                column.name = candidate;
            }
        }
    }

    fn handle_missing(
        &self,
        frame: DataFrame,
        descriptor: &DatasetDescriptor,
        report: &mut CleaningReport,
    ) -> Result<DataFrame> {
        let targets = descriptor.target_names();
        let null_targets: HashSet<usize> = (0..frame.n_rows())
            .filter(|&row| {
                targets
                    .iter()
                    .filter_map(|t| frame.column(t))
                    .any(|c| c.data.is_null(row))
            })
            .collect();
        report.dropped_null_target_rows = null_targets.len();
        let mut frame = without_rows(&frame, &null_targets);

        let na = &self.strategy.na_handling_strategy;
        if na.drop_na {
            let with_nulls: HashSet<usize> = (0..frame.n_rows())
                .filter(|&row| frame.row_has_null(row))
                .collect();
            report.dropped_na_rows = with_nulls.len();
            return Ok(without_rows(&frame, &with_nulls));
        }

        for column in frame.columns_mut() {
            if column.data.null_count() == 0 {
                continue;
            }
            match self.fill_value(column, descriptor.column(&column.name)) {
                Some(value) => {
                    let filled = column.fill_nulls(&value)?;
                    tracing::debug!("Imputed {} value(s) in '{}' with {}", filled, column.name, value);
                    *report.imputed.entry(column.name.clone()).or_insert(0) += filled;
                }
                None => {
                    tracing::warn!("Column '{}' keeps its missing values", column.name);
                    report.unimputed_columns.push(column.name.clone());
                }
            }
        }
        Ok(frame)
    }

    /// Column settings win over the strategy; unsupported schemes fall back to
    /// median for numeric columns and mode for categorical and boolean ones.
    fn fill_value(&self, column: &Column, descriptor: Option<&ColumnDescriptor>) -> Option<Scalar> {
        let na = &self.strategy.na_handling_strategy;
        let (scheme, value) = match descriptor.and_then(|d| d.imputation_scheme.map(|s| (s, d))) {
            Some((scheme, d)) => (scheme, d.imputation_value.clone()),
            None => (na.imputation_scheme, na.imputation_value.clone()),
        };

        let dtype = column.dtype();
        let usable = scheme_supports(dtype, scheme)
            && (scheme != ImputationScheme::Value
                || value.as_ref().map(|v| value_supports(dtype, v)).unwrap_or(false));
        let scheme = if usable {
            scheme
        } else {
            match dtype {
                Dtype::Integer | Dtype::Float => ImputationScheme::Median,
                Dtype::Categorical | Dtype::Boolean => ImputationScheme::Mode,
                Dtype::Date => return None,
            }
        };

        let numeric = column.data.numeric_values().unwrap_or_default();
        match scheme {
            ImputationScheme::Mean => stats::mean(&numeric).map(Scalar::Float),
            ImputationScheme::Median => stats::median(&numeric).map(Scalar::Float),
            ImputationScheme::Mode => column.data.mode(),
            ImputationScheme::Value => value,
        }
    }

    fn handle_imbalance(
        &self,
        frame: DataFrame,
        descriptor: &DatasetDescriptor,
        report: &mut CleaningReport,
    ) -> DataFrame {
        let imbalance = &self.strategy.imbalance_handling_strategy;
        if imbalance.sampling == SamplingScheme::None {
            return frame;
        }
        let [target] = descriptor.target_statistics() else {
            tracing::warn!("Resampling needs exactly one target column, skipping");
            return frame;
        };
        if !target.is_classification() {
            tracing::warn!("Target '{}' is continuous, skipping resampling", target.column);
            return frame;
        }
        let Some(column) = frame.column(&target.column) else {
            return frame;
        };

        let groups = class_rows(column);
        let before = class_counts(&groups);
        let (Some(&majority), Some(&minority)) = (before.values().max(), before.values().min()) else {
            return frame;
        };
        if majority == 0 || (minority as f64 / majority as f64) >= imbalance.threshold {
            return frame;
        }

        let rows: Vec<usize> = match imbalance.sampling {
            SamplingScheme::Over => {
                let mut rows: Vec<usize> = (0..frame.n_rows()).collect();
                for members in groups.values() {
                    rows.extend((members.len()..majority).map(|i| members[i % members.len()]));
                }
                rows
            }
            SamplingScheme::Under => {
                let mut rows: Vec<usize> = groups
                    .values()
                    .flat_map(|members| members.iter().take(minority).copied())
                    .collect();
                rows.sort_unstable();
                rows
            }
            SamplingScheme::None => return frame,
        };

        let resampled = frame.take_rows(&rows);
        let after = resampled
            .column(&target.column)
            .map(|c| class_counts(&class_rows(c)))
            .unwrap_or_default();
        report.resampled = Some(ResampleReport {
            scheme: imbalance.sampling,
            target: target.column.clone(),
            before,
            after,
        });
        resampled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::enums::OutlierDetectingScheme;
    use crate::schema::{ImbalanceStrategy, NaStrategy, OutlierStrategy};

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::integer("id", vec![Some(1), Some(2), Some(2), Some(4), Some(5), Some(6)]),
            Column::float("score", vec![Some(1.0), None, None, Some(3.0), Some(5.0), Some(7.0)]),
            Column::categorical("city", vec![Some("Oslo"), Some("Rome"), Some("Rome"), None, Some("Oslo"), Some("Bern")]),
            Column::categorical("label", vec![Some("a"), Some("b"), Some("b"), Some("a"), Some("a"), Some("a")]),
        ])
        .unwrap()
    }

    fn describe(frame: &DataFrame) -> DatasetDescriptor {
        DatasetDescriptor::build_from_dataset(frame, &["label"]).unwrap()
    }

    #[test]
    fn test_drops_duplicate_rows_and_imputes() {
        let frame = frame();
        let cleaner = Cleaner::new(CleaningStrategy {
            drop_duplicate_rows: true,
            ..CleaningStrategy::default()
        });
        let (out, report) = cleaner.clean(&frame, &describe(&frame)).unwrap();

        assert_eq!(report.dropped_duplicate_rows, 1);
        assert_eq!(out.n_rows(), 5);
        // median of 1, 3, 5, 7
        assert_eq!(out.column("score").unwrap().data.get(1), Some(Scalar::Float(4.0)));
        assert_eq!(out.column("city").unwrap().data.get(2), Some(Scalar::Str("Oslo".into())));
        assert_eq!(report.imputed.get("score"), Some(&1));
        assert_eq!(report.imputed.get("city"), Some(&1));
        assert!(report.unimputed_columns.is_empty());
    }

    #[test]
    fn test_drop_na_removes_incomplete_rows() {
        let frame = frame();
        let cleaner = Cleaner::new(CleaningStrategy {
            na_handling_strategy: NaStrategy {
                drop_na: true,
                ..NaStrategy::default()
            },
            ..CleaningStrategy::default()
        });
        let (out, report) = cleaner.clean(&frame, &describe(&frame)).unwrap();
        assert_eq!(report.dropped_na_rows, 3);
        assert_eq!(out.n_rows(), 3);
    }

    #[test]
    fn test_column_setting_overrides_strategy() {
        let frame = frame();
        let mut descriptor = describe(&frame);
        let score = descriptor.column("score").unwrap().clone();
        *descriptor.column_mut("score").unwrap() = score
            .with_imputation(ImputationScheme::Value, Some(Scalar::Float(-1.0)))
            .unwrap();

        let cleaner = Cleaner::new(CleaningStrategy::default());
        let (out, _) = cleaner.clean(&frame, &descriptor).unwrap();
        assert_eq!(out.column("score").unwrap().data.get(1), Some(Scalar::Float(-1.0)));
    }

    #[test]
    fn test_invalid_scheme_falls_back() {
        let frame = frame();
        let cleaner = Cleaner::new(CleaningStrategy {
            na_handling_strategy: NaStrategy {
                imputation_scheme: ImputationScheme::Mean,
                ..NaStrategy::default()
            },
            ..CleaningStrategy::default()
        });
        let (out, _) = cleaner.clean(&frame, &describe(&frame)).unwrap();
        assert_eq!(out.column("score").unwrap().data.get(1), Some(Scalar::Float(4.0)));
        // mean is not valid for text; mode ties resolve to the smallest label
        assert_eq!(out.column("city").unwrap().data.get(3), Some(Scalar::Str("Oslo".into())));
    }

    #[test]
    fn test_null_targets_are_dropped() {
        let frame = DataFrame::new(vec![
            Column::integer("x", vec![Some(1), Some(2), Some(3)]),
            Column::categorical("label", vec![Some("a"), None, Some("b")]),
        ])
        .unwrap();
        let (out, report) = Cleaner::default().clean(&frame, &describe(&frame)).unwrap();
        assert_eq!(report.dropped_null_target_rows, 1);
        assert_eq!(out.n_rows(), 2);
    }

    #[test]
    fn test_duplicate_columns_renamed_or_dropped() {
        let frame = DataFrame::new(vec![
            Column::integer("a", vec![Some(1), Some(2)]),
            Column::integer("a", vec![Some(3), Some(4)]),
            Column::integer("a.1", vec![Some(5), Some(6)]),
            Column::categorical("label", vec![Some("x"), Some("y")]),
        ])
        .unwrap();
        let descriptor = describe(&frame);

        let renamer = Cleaner::new(CleaningStrategy {
            rename_duplicate_columns: true,
            ..CleaningStrategy::default()
        });
        let (renamed, report) = renamer.clean(&frame, &descriptor).unwrap();
        assert_eq!(renamed.column_names(), vec!["a", "a.2", "a.1", "label"]);
        assert_eq!(report.renamed_columns.len(), 1);

        let dropper = Cleaner::new(CleaningStrategy {
            drop_duplicate_column: true,
            ..CleaningStrategy::default()
        });
        let (dropped, report) = dropper.clean(&frame, &descriptor).unwrap();
        assert_eq!(dropped.column_names(), vec!["a", "a.1", "label"]);
        assert_eq!(report.dropped_duplicate_columns, vec!["a"]);
    }

    #[test]
    fn test_outliers_counted_and_dropped() {
        let mut values: Vec<Option<f64>> = (0..20).map(|i| Some(10.0 + (i % 5) as f64)).collect();
        values.push(Some(900.0));
        let labels: Vec<Option<&str>> = (0..21).map(|i| Some(if i % 2 == 0 { "a" } else { "b" })).collect();
        let frame = DataFrame::new(vec![Column::float("x", values), Column::categorical("label", labels)]).unwrap();

        let keep = Cleaner::new(CleaningStrategy::default());
        let (out, report) = keep.clean(&frame, &describe(&frame)).unwrap();
        assert_eq!(report.outlier_rows, 1);
        assert_eq!(out.n_rows(), 21);

        let drop = Cleaner::new(CleaningStrategy {
            outlier_handling_strategy: OutlierStrategy {
                detection_scheme: OutlierDetectingScheme::Iqr,
                drop_outlier: true,
            },
            ..CleaningStrategy::default()
        });
        let (out, report) = drop.clean(&frame, &describe(&frame)).unwrap();
        assert_eq!(report.dropped_outlier_rows, 1);
        assert_eq!(out.n_rows(), 20);
    }

    #[test]
    fn test_over_and_under_sampling() {
        let frame = frame();
        let descriptor = describe(&frame);

        let over = Cleaner::new(CleaningStrategy {
            imbalance_handling_strategy: ImbalanceStrategy {
                sampling: SamplingScheme::Over,
                threshold: 0.9,
            },
            ..CleaningStrategy::default()
        });
        let (out, report) = over.clean(&frame, &descriptor).unwrap();
        let resampled = report.resampled.unwrap();
        assert_eq!(resampled.before.get("b"), Some(&2));
        assert_eq!(resampled.after.get("b"), Some(&4));
        assert_eq!(resampled.after.get("a"), Some(&4));
        assert_eq!(out.n_rows(), 8);

        let under = Cleaner::new(CleaningStrategy {
            imbalance_handling_strategy: ImbalanceStrategy {
                sampling: SamplingScheme::Under,
                threshold: 0.9,
            },
            ..CleaningStrategy::default()
        });
        let (out, report) = under.clean(&frame, &descriptor).unwrap();
        assert_eq!(report.resampled.unwrap().after.get("a"), Some(&2));
        assert_eq!(out.n_rows(), 4);
    }

    #[test]
    fn test_balanced_target_is_not_resampled() {
        let frame = frame();
        let cleaner = Cleaner::new(CleaningStrategy {
            imbalance_handling_strategy: ImbalanceStrategy {
                sampling: SamplingScheme::Over,
                threshold: 0.3,
            },
            ..CleaningStrategy::default()
        });
        let (out, report) = cleaner.clean(&frame, &describe(&frame)).unwrap();
        assert!(report.resampled.is_none());
        assert_eq!(out.n_rows(), 6);
    }
}
