use ndarray::{Array3, ArrayView1, Axis};

use crate::prelude::{ProcessingStage, StageError, StageResult};
use crate::processing::scaling::ScaledTable;
use crate::telemetry::log::LogManager;

/// Standardized features viewed as `(samples, features, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    data: Array3<f64>,
}

impl InputTensor {
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn n_samples(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn n_features(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// Feature vector of one sample.
    pub fn sample(&self, index: usize) -> ArrayView1<'_, f64> {
        self.data.index_axis(Axis(0), index).index_axis_move(Axis(1), 0)
    }
}

/// Adds the trailing unit axis the sequence model expects.
pub struct TensorShaper {
    logger: LogManager,
}

impl TensorShaper {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("tensor"),
        }
    }
}

impl Default for TensorShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for TensorShaper {
    type Input = ScaledTable;
    type Output = InputTensor;

    fn name(&self) -> &'static str {
        "tensor shaper"
    }

    fn execute(&mut self, input: &ScaledTable) -> StageResult<InputTensor> {
        let (rows, cols) = input.shape();
        if rows == 0 || cols == 0 {
            return Err(StageError::Shape { rows, cols });
        }

        let data = input.values.to_owned().insert_axis(Axis(2));
        self.logger
            .record(&format!("tensor shape ({}, {}, 1)", rows, cols));
        Ok(InputTensor { data })
    }
}
