use serde::{Deserialize, Serialize};

use crate::inference::{ModelError, RegressionModel};
use crate::prelude::{ProcessingStage, StageError, StageResult};
use crate::processing::tensor::InputTensor;
use crate::telemetry::log::LogManager;

/// One predicted SW-PC value per input row, in row order. Not clipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionVector(pub Vec<f64>);

impl PredictionVector {
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Runs a loaded model over the input tensor.
pub struct Predictor {
    model: Option<Box<dyn RegressionModel>>,
    logger: LogManager,
}

impl Predictor {
    pub fn new(model: Box<dyn RegressionModel>) -> Self {
        Self {
            model: Some(model),
            logger: LogManager::new("predict"),
        }
    }
}

impl ProcessingStage for Predictor {
    type Input = InputTensor;
    type Output = PredictionVector;

    fn name(&self) -> &'static str {
        "predictor"
    }

    fn execute(&mut self, input: &InputTensor) -> StageResult<PredictionVector> {
        let model = self.model.as_ref().ok_or_else(|| {
            StageError::ModelInvocation(ModelError::Runtime("model already released".into()))
        })?;

        if let Some(expected) = model.input_width() {
            if expected != input.n_features() {
                return Err(StageError::ModelInvocation(ModelError::WidthMismatch {
                    expected,
                    actual: input.n_features(),
                }));
            }
        }

        let values = model.predict(input).map_err(StageError::ModelInvocation)?;
        if values.len() != input.n_samples() {
            return Err(StageError::ModelInvocation(ModelError::OutputLength {
                expected: input.n_samples(),
                actual: values.len(),
            }));
        }

        self.logger.record(&format!("{} predictions", values.len()));
        Ok(PredictionVector(values))
    }

    fn cleanup(&mut self) {
        self.model = None;
    }
}

/// Depth and prediction lengths disagreed when pairing for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthMismatch {
    pub depth_len: usize,
    pub prediction_len: usize,
}

/// Predictions paired with depth, truncated to the shorter of the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthProfile {
    pub depth: Vec<f64>,
    pub predictions: Vec<f64>,
    pub mismatch: Option<LengthMismatch>,
}

impl DepthProfile {
    pub fn pair(depth: &[f64], predictions: &PredictionVector) -> Self {
        let len = depth.len().min(predictions.len());
        let mismatch = if depth.len() != predictions.len() {
            let mismatch = LengthMismatch {
                depth_len: depth.len(),
                prediction_len: predictions.len(),
            };
            LogManager::new("predict").warn(&format!(
                "depth has {} samples but {} predictions; truncating to {}",
                mismatch.depth_len, mismatch.prediction_len, len
            ));
            Some(mismatch)
        } else {
            None
        };

        Self {
            depth: depth[..len].to_vec(),
            predictions: predictions.values()[..len].to_vec(),
            mismatch,
        }
    }

    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::LinearModel;
    use crate::processing::scaling::{ScaledTable, ScalingMethod};
    use crate::processing::tensor::TensorShaper;
    use ndarray::Array2;

    fn tensor(rows: usize, cols: usize) -> InputTensor {
        let table = ScaledTable {
            method: ScalingMethod::Standard,
            values: Array2::from_shape_fn((rows, cols), |(r, c)| (r + c) as f64),
        };
        TensorShaper::new().execute(&table).unwrap()
    }

    struct FailingModel;

    impl RegressionModel for FailingModel {
        fn predict(&self, _tensor: &InputTensor) -> Result<Vec<f64>, ModelError> {
            Err(ModelError::Runtime("graph execution failed".into()))
        }
    }

    struct ShortModel;

    impl RegressionModel for ShortModel {
        fn predict(&self, _tensor: &InputTensor) -> Result<Vec<f64>, ModelError> {
            Ok(vec![0.5])
        }
    }

    #[test]
    fn linear_model_predicts_each_row_in_order() {
        let mut weights = vec![0.0; 10];
        weights[1] = 0.1;
        let mut predictor = Predictor::new(Box::new(LinearModel::new(weights, 0.2)));

        let predictions = predictor.execute(&tensor(3, 10)).unwrap();
        let expected = [0.3, 0.4, 0.5];
        assert_eq!(predictions.len(), 3);
        for (got, want) in predictions.values().iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn width_mismatch_is_a_model_invocation_error() {
        let mut predictor = Predictor::new(Box::new(LinearModel::new(vec![1.0; 8], 0.0)));
        let err = predictor.execute(&tensor(2, 10)).unwrap_err();
        assert!(matches!(
            err,
            StageError::ModelInvocation(ModelError::WidthMismatch {
                expected: 8,
                actual: 10
            })
        ));
    }

    #[test]
    fn runtime_failures_are_wrapped() {
        let mut predictor = Predictor::new(Box::new(FailingModel));
        let err = predictor.execute(&tensor(2, 10)).unwrap_err();
        assert!(err.to_string().contains("graph execution failed"));
    }

    #[test]
    fn short_output_is_rejected() {
        let mut predictor = Predictor::new(Box::new(ShortModel));
        let err = predictor.execute(&tensor(2, 10)).unwrap_err();
        assert!(matches!(
            err,
            StageError::ModelInvocation(ModelError::OutputLength {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn cleanup_releases_model() {
        let mut predictor = Predictor::new(Box::new(ShortModel));
        predictor.cleanup();
        assert!(predictor.execute(&tensor(1, 10)).is_err());
    }

    #[test]
    fn depth_pairing_truncates_and_flags_mismatch() {
        let predictions = PredictionVector(vec![0.1, 0.2, 0.3]);
        let profile = DepthProfile::pair(&[100.0, 101.0], &predictions);
        assert_eq!(profile.depth, vec![100.0, 101.0]);
        assert_eq!(profile.predictions, vec![0.1, 0.2]);
        assert_eq!(
            profile.mismatch,
            Some(LengthMismatch {
                depth_len: 2,
                prediction_len: 3
            })
        );

        let aligned = DepthProfile::pair(&[1.0, 2.0, 3.0], &predictions);
        assert_eq!(aligned.len(), 3);
        assert!(aligned.mismatch.is_none());
    }
}
