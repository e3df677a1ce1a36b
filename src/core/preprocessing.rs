use crate::frame::DataFrame;
use crate::schema::enums::Dtype;
use crate::schema::{DatasetDescriptor, PreprocessingStrategy};
use crate::transformer::{
    BinaryEncoder, ColumnDropper, DatetimeSplitter, Transformer, TransformerPipeline, TypeSelector,
};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Output of [`Preprocessor::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prepared {
    #[serde(skip)]
    pub frame: DataFrame,
    /// Names of the transformer steps that ran, in order.
    pub steps: Vec<String>,
    /// Output columns that are not targets.
    pub feature_names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    strategy: PreprocessingStrategy,
}

impl Preprocessor {
    pub fn new(strategy: PreprocessingStrategy) -> Self {
        Self { strategy }
    }

    /// Builds the transformer chain for `frame`.
    pub fn build(&self, frame: &DataFrame, descriptor: &DatasetDescriptor) -> TransformerPipeline {
        let mut pipeline = TransformerPipeline::new();

        let deselected: Vec<String> = descriptor
            .columns_info
            .iter()
            .filter(|c| !c.is_selected && !c.is_target() && frame.has_column(&c.name))
            .map(|c| c.name.clone())
            .collect();
        if !deselected.is_empty() {
            pipeline.push(ColumnDropper::new(deselected));
        }
        if self.strategy.split_datetime_column {
            pipeline.push(DatetimeSplitter::new());
        }
        if self.strategy.transform_binary_column {
            pipeline.push(BinaryEncoder::skipping(descriptor.target_names()));
        }
        if self.strategy.remove_datetime_column {
            pipeline.push(TypeSelector::exclude(vec![Dtype::Date]));
        }
        pipeline
    }

    pub fn run(&self, frame: &DataFrame, descriptor: &DatasetDescriptor) -> Result<Prepared> {
        let mut pipeline = self.build(frame, descriptor);
        let steps = pipeline.step_names().into_iter().map(String::from).collect();

        let (frame, columns) = if pipeline.is_empty() {
            (frame.clone(), frame.column_names())
        } else {
            let out = pipeline.fit_transform(frame)?;
            let names = pipeline.feature_names()?;
            (out, names)
        };

        let targets = descriptor.target_names();
        let feature_names: Vec<String> = columns
            .into_iter()
            .filter(|name| !targets.contains(&name.as_str()))
            .collect();
        tracing::info!(
            "Preprocessing produced {} rows x {} columns ({} features)",
            frame.n_rows(),
            frame.n_cols(),
            feature_names.len()
        );

        Ok(Prepared {
            frame,
            steps,
            feature_names,
        })
    }
}
