use super::{check_frame, not_fitted, Transformer};
use crate::frame::DataFrame;
use crate::schema::enums::Dtype;
use crate::utils::error::{AutoMlError, Result};

#[derive(Debug, Clone)]
struct Fitted {
    dtypes: Vec<Dtype>,
    feature_names: Vec<String>,
}

/// Selects columns by dtype.
///
/// An empty `include` list means every dtype; `exclude` is applied after it.
/// The input layout seen during `fit` must match the layout given to `transform`.
#[derive(Debug, Clone)]
pub struct TypeSelector {
    include: Vec<Dtype>,
    exclude: Vec<Dtype>,
    fitted: Option<Fitted>,
}

impl TypeSelector {
    pub fn new(include: Vec<Dtype>, exclude: Vec<Dtype>) -> Self {
        Self {
            include,
            exclude,
            fitted: None,
        }
    }

    pub fn include(dtypes: Vec<Dtype>) -> Self {
        Self::new(dtypes, Vec::new())
    }

    pub fn exclude(dtypes: Vec<Dtype>) -> Self {
        Self::new(Vec::new(), dtypes)
    }

    /// Input dtypes recorded at fit time.
    pub fn fitted_dtypes(&self) -> Option<&[Dtype]> {
        self.fitted.as_ref().map(|f| f.dtypes.as_slice())
    }
}

fn dtype_names(dtypes: &[Dtype]) -> Vec<String> {
    dtypes.iter().map(|d| d.to_string()).collect()
}

impl Transformer for TypeSelector {
    fn name(&self) -> &'static str {
        "TypeSelector"
    }

    fn fit(&mut self, frame: &DataFrame) -> Result<()> {
        check_frame(frame)?;
        let feature_names = frame
            .select_dtypes(&self.include, &self.exclude)
            .column_names();
        if feature_names.is_empty() {
            return Err(AutoMlError::EmptySelection {
                message: "Provided type(s) results in empty dataframe".to_string(),
            });
        }
        self.fitted = Some(Fitted {
            dtypes: frame.dtypes(),
            feature_names,
        });
        Ok(())
    }

    fn transform(&self, frame: &DataFrame) -> Result<DataFrame> {
        let fitted = self.fitted.as_ref().ok_or_else(|| not_fitted(self.name()))?;
        let dtypes = frame.dtypes();
        if dtypes != fitted.dtypes {
            return Err(AutoMlError::DtypeMismatch {
                fit: dtype_names(&fitted.dtypes),
                transform: dtype_names(&dtypes),
            });
        }
        check_frame(frame)?;
        Ok(frame.select_dtypes(&self.include, &self.exclude))
    }

    fn feature_names(&self) -> Result<Vec<String>> {
        self.fitted
            .as_ref()
            .map(|f| f.feature_names.clone())
            .ok_or_else(|| not_fitted(self.name()))
    }
}
