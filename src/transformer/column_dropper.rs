use super::{check_frame, not_fitted, to_names, Transformer};
use crate::frame::DataFrame;
use crate::utils::error::{AutoMlError, Result};

/// Drops named columns from a frame.
///
/// Fitting fails when a column is missing from the input or when dropping
/// would leave no columns at all.
#[derive(Debug, Clone)]
pub struct ColumnDropper {
    columns: Vec<String>,
    feature_names: Option<Vec<String>>,
}

impl ColumnDropper {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: to_names(columns),
            feature_names: None,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Transformer for ColumnDropper {
    fn name(&self) -> &'static str {
        "ColumnDropper"
    }

    fn fit(&mut self, frame: &DataFrame) -> Result<()> {
        check_frame(frame)?;
        let remaining = frame.drop_columns(&self.columns)?.column_names();
        if remaining.is_empty() {
            return Err(AutoMlError::EmptySelection {
                message: format!(
                    "Dropping {:?} would result in an empty output DataFrame",
                    self.columns
                ),
            });
        }
        self.feature_names = Some(remaining);
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> Result<DataFrame> {
        if self.feature_names.is_none() {
            return Err(not_fitted(self.name()));
        }
        check_frame(frame)?;
        if self.columns.is_empty() {
            return Ok(frame.clone());
        }
        frame.drop_columns(&self.columns)
    }

    fn feature_names(&self) -> Result<Vec<String>> {
        self.feature_names
            .clone()
            .ok_or_else(|| not_fitted(self.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Column;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::integer("a", vec![Some(1), Some(2)]),
            Column::integer("b", vec![Some(3), Some(4)]),
            Column::categorical("c", vec![Some("x"), Some("y")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_drops_columns() {
        let mut dropper = ColumnDropper::new(["a", "c"]);
        let out = dropper.fit_transform(&sample()).unwrap();
        assert_eq!(out.column_names(), vec!["b"]);
        assert_eq!(dropper.feature_names().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_missing_column_fails_fit() {
        let mut dropper = ColumnDropper::new(["a", "zzz"]);
        match dropper.fit(&sample()) {
            Err(AutoMlError::ColumnNotFound { columns }) => assert_eq!(columns, vec!["zzz"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_dropping_everything_fails() {
        let mut dropper = ColumnDropper::new(["a", "b", "c"]);
        assert!(matches!(
            dropper.fit(&sample()),
            Err(AutoMlError::EmptySelection { .. })
        ));
    }

    #[test]
    fn test_empty_list_is_identity() {
        let mut dropper = ColumnDropper::new(Vec::<String>::new());
        let out = dropper.fit_transform(&sample()).unwrap();
        assert_eq!(out, sample());
    }

    #[test]
    fn test_transform_before_fit() {
        let dropper = ColumnDropper::new(["a"]);
        assert!(matches!(
            dropper.transform(&sample()),
            Err(AutoMlError::NotFitted { .. })
        ));
    }

    #[test]
    fn test_empty_frame_is_rejected() {
        let mut dropper = ColumnDropper::new(["a"]);
        assert!(matches!(
            dropper.fit(&DataFrame::default()),
            Err(AutoMlError::EmptyFrame)
        ));
    }
}
