//! Fit/transform column transformers that can be chained into a pipeline.
//!
//! Every transformer learns what it needs in `fit` and refuses to `transform`
//! before that with [`AutoMlError::NotFitted`].

pub mod binary_encoder;
pub mod column_dropper;
pub mod column_selector;
pub mod datetime_splitter;
pub mod identity;
pub mod type_selector;

pub use binary_encoder::BinaryEncoder;
pub use column_dropper::ColumnDropper;
pub use column_selector::ColumnSelector;
pub use datetime_splitter::DatetimeSplitter;
pub use identity::IdentityTransformer;
pub use type_selector::TypeSelector;

use crate::frame::DataFrame;
use crate::utils::error::{AutoMlError, Result};

pub trait Transformer: Send + Sync {
    fn name(&self) -> &'static str;

    fn fit(&mut self, frame: &DataFrame) -> Result<()>;

    fn transform(&self, frame: &DataFrame) -> Result<DataFrame>;

    fn fit_transform(&mut self, frame: &DataFrame) -> Result<DataFrame> {
        self.fit(frame)?;
        self.transform(frame)
    }

    /// Column names `transform` produces, available once fitted.
    fn feature_names(&self) -> Result<Vec<String>>;
}

pub(crate) fn check_frame(frame: &DataFrame) -> Result<()> {
    if frame.is_empty() {
        return Err(AutoMlError::EmptyFrame);
    }
    Ok(())
}

pub(crate) fn not_fitted(name: &str) -> AutoMlError {
    AutoMlError::NotFitted {
        transformer: name.to_string(),
    }
}

pub(crate) fn to_names<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect()
}

/// Ordered chain of transformers; each step is fitted on the previous step's output.
#[derive(Default)]
pub struct TransformerPipeline {
    steps: Vec<Box<dyn Transformer>>,
    fitted: bool,
}

impl TransformerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step<T: Transformer + 'static>(mut self, step: T) -> Self {
        self.push(step);
        self
    }

    pub fn push<T: Transformer + 'static>(&mut self, step: T) {
        self.steps.push(Box::new(step));
        self.fitted = false;
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Transformer for TransformerPipeline {
    fn name(&self) -> &'static str {
        "TransformerPipeline"
    }

    fn fit(&mut self, frame: &DataFrame) -> Result<()> {
        self.fit_transform(frame).map(|_| ())
    }

    fn transform(&self, frame: &DataFrame) -> Result<DataFrame> {
        if !self.fitted {
            return Err(not_fitted(self.name()));
        }
        let mut current = frame.clone();
        for step in &self.steps {
            current = step.transform(&current)?;
        }
        Ok(current)
    }

    fn fit_transform(&mut self, frame: &DataFrame) -> Result<DataFrame> {
        let mut current = frame.clone();
        for step in &mut self.steps {
            tracing::debug!("Fitting pipeline step {}", step.name());
            current = step.fit_transform(&current)?;
        }
        self.fitted = true;
        Ok(current)
    }

    fn feature_names(&self) -> Result<Vec<String>> {
        if !self.fitted {
            return Err(not_fitted(self.name()));
        }
        match self.steps.last() {
            Some(step) => step.feature_names(),
            None => Err(AutoMlError::EmptySelection {
                message: "Pipeline has no steps".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::Column;
    use crate::schema::enums::Dtype;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::integer("id", vec![Some(1), Some(2), Some(3)]),
            Column::float("price", vec![Some(1.5), Some(2.5), Some(3.0)]),
            Column::categorical("city", vec![Some("Oslo"), Some("Rome"), Some("Oslo")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_pipeline_chains_steps() {
        let mut pipeline = TransformerPipeline::new()
            .with_step(ColumnDropper::new(["id"]))
            .with_step(TypeSelector::new(vec![Dtype::Float], vec![]));

        let out = pipeline.fit_transform(&sample()).unwrap();
        assert_eq!(out.column_names(), vec!["price"]);
        assert_eq!(pipeline.feature_names().unwrap(), vec!["price"]);
        assert_eq!(pipeline.step_names(), vec!["ColumnDropper", "TypeSelector"]);

        let again = pipeline.transform(&sample()).unwrap();
        assert_eq!(again, out);
    }

    #[test]
    fn test_pipeline_requires_fit() {
        let pipeline = TransformerPipeline::new().with_step(IdentityTransformer::new(false));
        assert!(matches!(
            pipeline.transform(&sample()),
            Err(AutoMlError::NotFitted { .. })
        ));
    }

    #[test]
    fn test_pipeline_propagates_step_errors() {
        let mut pipeline = TransformerPipeline::new().with_step(ColumnSelector::new(["missing"]));
        assert!(matches!(
            pipeline.fit(&sample()),
            Err(AutoMlError::ColumnNotFound { .. })
        ));
    }
}
