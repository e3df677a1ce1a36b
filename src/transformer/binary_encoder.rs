use super::{check_frame, not_fitted, to_names, Transformer};
use crate::frame::{Column, ColumnData, DataFrame};
use crate::utils::error::{AutoMlError, Result};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
struct Mapping {
    column: String,
    /// Label encoded as 0, then the label encoded as 1.
    labels: [String; 2],
}

/// Encodes two-valued categorical and boolean columns as integer 0/1.
///
/// Labels are ordered lexically, so `false`/`true` map to 0/1 and `no`/`yes`
/// map to 0/1. Columns listed in `skip` (usually targets) are left alone.
#[derive(Debug, Clone, Default)]
pub struct BinaryEncoder {
    skip: Vec<String>,
    mappings: Option<Vec<Mapping>>,
    feature_names: Vec<String>,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skipping<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skip: to_names(columns),
            ..Self::default()
        }
    }

    /// Columns that will be encoded, available once fitted.
    pub fn encoded_columns(&self) -> Vec<&str> {
        self.mappings
            .iter()
            .flatten()
            .map(|m| m.column.as_str())
            .collect()
    }
}

fn labels_of(column: &Column) -> Option<BTreeSet<String>> {
    if !matches!(column.data, ColumnData::Categorical(_) | ColumnData::Boolean(_)) {
        return None;
    }
    let labels: BTreeSet<String> = (0..column.len())
        .filter_map(|row| column.data.get(row))
        .map(|v| v.to_string())
        .collect();
    Some(labels)
}

impl Transformer for BinaryEncoder {
    fn name(&self) -> &'static str {
        "BinaryEncoder"
    }

    fn fit(&mut self, frame: &DataFrame) -> Result<()> {
        check_frame(frame)?;
        let mut mappings = Vec::new();
        for column in frame.columns() {
            if self.skip.contains(&column.name) || mappings.iter().any(|m: &Mapping| m.column == column.name) {
                continue;
            }
            let Some(labels) = labels_of(column) else {
                continue;
            };
            if labels.len() != 2 {
                continue;
            }
            let mut it = labels.into_iter();
            if let (Some(zero), Some(one)) = (it.next(), it.next()) {
                mappings.push(Mapping {
                    column: column.name.clone(),
                    labels: [zero, one],
                });
            }
        }
        tracing::debug!("BinaryEncoder will encode {} column(s)", mappings.len());
        self.mappings = Some(mappings);
        self.feature_names = frame.column_names();
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> Result<DataFrame> {
        let mappings = self.mappings.as_ref().ok_or_else(|| not_fitted(self.name()))?;
        check_frame(frame)?;
        let missing = frame.missing_columns(
            &mappings.iter().map(|m| m.column.as_str()).collect::<Vec<_>>(),
        );
        if !missing.is_empty() {
            return Err(AutoMlError::column_not_found(missing));
        }

        let mut columns = frame.clone().into_columns();
        for column in columns.iter_mut() {
            let Some(mapping) = mappings.iter().find(|m| m.column == column.name) else {
                continue;
            };
            let mut encoded = Vec::with_capacity(column.len());
            for row in 0..column.len() {
                let code = match column.data.get(row) {
                    None => None,
                    Some(value) => {
                        let label = value.to_string();
                        let idx = mapping.labels.iter().position(|l| *l == label).ok_or_else(|| {
                            AutoMlError::UnsupportedDtype {
                                column: column.name.clone(),
                                reason: format!("label '{}' was not seen during fit", label),
                            }
                        })?;
                        Some(idx as i64)
                    }
                };
                encoded.push(code);
            }
            column.data = ColumnData::Integer(encoded);
        }
        DataFrame::new(columns)
    }

    fn feature_names(&self) -> Result<Vec<String>> {
        if self.mappings.is_none() {
            return Err(not_fitted(self.name()));
        }
        Ok(self.feature_names.clone())
    }
}
