use super::{check_frame, not_fitted, Transformer};
use crate::frame::{Column, ColumnData, DataFrame};
use crate::utils::error::{AutoMlError, Result};

/// Passes its input through unchanged; useful as a pipeline placeholder.
///
/// With `check_input` enabled the input must be a non-empty, fully numeric
/// frame without missing or non-finite values, and it is cast to float.
#[derive(Debug, Clone, Default)]
pub struct IdentityTransformer {
    check_input: bool,
    shape: Option<(usize, usize)>,
    feature_names: Vec<String>,
}

impl IdentityTransformer {
    pub fn new(check_input: bool) -> Self {
        Self {
            check_input,
            ..Self::default()
        }
    }

    pub fn n_samples(&self) -> Option<usize> {
        self.shape.map(|(rows, _)| rows)
    }

    pub fn n_features_in(&self) -> Option<usize> {
        self.shape.map(|(_, cols)| cols)
    }

    /// `(n_samples, n_features_in)` seen during fit.
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.shape
    }
}

fn as_finite_float(column: &Column) -> Result<Column> {
    let unsupported = |reason: &str| AutoMlError::UnsupportedDtype {
        column: column.name.clone(),
        reason: reason.to_string(),
    };
    let values: Vec<Option<f64>> = match &column.data {
        ColumnData::Integer(v) => v.iter().map(|x| x.map(|x| x as f64)).collect(),
        ColumnData::Float(v) => v.clone(),
        ColumnData::Boolean(v) => v.iter().map(|x| x.map(|b| if b { 1.0 } else { 0.0 })).collect(),
        ColumnData::Categorical(_) | ColumnData::Date(_) => {
            return Err(unsupported("could not convert to float"))
        }
    };
    if values.iter().any(|v| v.map(|x| !x.is_finite()).unwrap_or(true)) {
        return Err(unsupported("input contains NaN, infinity or missing values"));
    }
    Ok(Column::float(column.name.clone(), values))
}

fn check_array(frame: &DataFrame) -> Result<DataFrame> {
    check_frame(frame)?;
    let columns = frame
        .columns()
        .iter()
        .map(as_finite_float)
        .collect::<Result<Vec<_>>>()?;
    DataFrame::new(columns)
}

impl Transformer for IdentityTransformer {
    fn name(&self) -> &'static str {
        "IdentityTransformer"
    }

    fn fit(&mut self, frame: &DataFrame) -> Result<()> {
        if self.check_input {
            check_array(frame)?;
        }
        self.shape = Some(frame.shape());
        self.feature_names = frame.column_names();
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> Result<DataFrame> {
        let output = if self.check_input {
            check_array(frame)?
        } else {
            frame.clone()
        };
        let expected = self.n_features_in().ok_or_else(|| not_fitted(self.name()))?;
        if output.n_cols() != expected {
            return Err(AutoMlError::ShapeMismatch {
                expected,
                actual: output.n_cols(),
            });
        }
        Ok(output)
    }

    fn feature_names(&self) -> Result<Vec<String>> {
        if self.shape.is_none() {
            return Err(not_fitted(self.name()));
        }
        Ok(self.feature_names.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric() -> DataFrame {
        DataFrame::new(vec![
            Column::integer("a", vec![Some(1), Some(2), Some(3)]),
            Column::boolean("b", vec![Some(true), Some(false), Some(true)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_passes_data_through() {
        let mut identity = IdentityTransformer::new(false);
        let out = identity.fit_transform(&numeric()).unwrap();
        assert_eq!(out, numeric());
        assert_eq!(identity.shape(), Some((3, 2)));
        assert_eq!(identity.n_samples(), Some(3));
    }

    #[test]
    fn test_check_input_casts_to_float() {
        let mut identity = IdentityTransformer::new(true);
        let out = identity.fit_transform(&numeric()).unwrap();
        assert_eq!(out.column("b").unwrap().data, ColumnData::Float(vec![Some(1.0), Some(0.0), Some(1.0)]));
    }

    #[test]
    fn test_check_input_rejects_missing_and_text() {
        let mut identity = IdentityTransformer::new(true);
        let with_null = DataFrame::new(vec![Column::float("a", vec![Some(1.0), None])]).unwrap();
        assert!(identity.fit(&with_null).is_err());

        let with_inf = DataFrame::new(vec![Column::float("a", vec![Some(f64::INFINITY)])]).unwrap();
        assert!(identity.fit(&with_inf).is_err());

        let text = DataFrame::new(vec![Column::categorical("a", vec![Some("x")])]).unwrap();
        assert!(identity.fit(&text).is_err());

        assert!(matches!(identity.fit(&DataFrame::default()), Err(AutoMlError::EmptyFrame)));
    }

    #[test]
    fn test_shape_mismatch() {
        let mut identity = IdentityTransformer::new(false);
        identity.fit(&numeric()).unwrap();
        let narrower = numeric().select(&["a"]).unwrap();
        assert!(matches!(
            identity.transform(&narrower),
            Err(AutoMlError::ShapeMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_transform_before_fit() {
        let identity = IdentityTransformer::new(false);
        assert!(matches!(
            identity.transform(&numeric()),
            Err(AutoMlError::NotFitted { .. })
        ));
    }
}
