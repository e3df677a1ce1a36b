use super::{check_frame, not_fitted, to_names, Transformer};
use crate::frame::DataFrame;
use crate::utils::error::{AutoMlError, Result};
use crate::utils::validation::check_column_length;

/// Keeps only the named columns, in the order given.
#[derive(Debug, Clone)]
pub struct ColumnSelector {
    columns: Vec<String>,
    fitted: bool,
}

impl ColumnSelector {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: to_names(columns),
            fitted: false,
        }
    }
}

impl Transformer for ColumnSelector {
    fn name(&self) -> &'static str {
        "ColumnSelector"
    }

    fn fit(&mut self, frame: &DataFrame) -> Result<()> {
        check_column_length(&self.columns)?;
        check_frame(frame)?;
        let missing = frame.missing_columns(&self.columns);
        if !missing.is_empty() {
            return Err(AutoMlError::column_not_found(missing));
        }
        self.fitted = true;
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> Result<DataFrame> {
        if !self.fitted {
            return Err(not_fitted(self.name()));
        }
        check_frame(frame)?;
        frame.select(&self.columns)
    }

    fn feature_names(&self) -> Result<Vec<String>> {
        if !self.fitted {
            return Err(not_fitted(self.name()));
        }
        Ok(self.columns.clone())
    }
}
