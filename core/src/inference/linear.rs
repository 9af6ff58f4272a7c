use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ModelError, RegressionModel};
use crate::processing::tensor::InputTensor;

/// Weights-and-bias regressor stored as JSON:
///
/// ```json
/// { "input_width": 10, "weights": [0.1, ...], "bias": 0.35 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub input_width: usize,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LinearModel {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            input_width: weights.len(),
            weights,
            bias,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let text = fs::read_to_string(path)
            .map_err(|_| ModelError::ArtifactMissing(path.to_path_buf()))?;
        let model: LinearModel =
            serde_json::from_str(&text).map_err(|e| ModelError::Malformed(e.to_string()))?;
        if model.weights.len() != model.input_width {
            return Err(ModelError::Malformed(format!(
                "{} weights for declared width {}",
                model.weights.len(),
                model.input_width
            )));
        }
        Ok(model)
    }
}

impl RegressionModel for LinearModel {
    fn input_width(&self) -> Option<usize> {
        Some(self.input_width)
    }

    fn predict(&self, tensor: &InputTensor) -> Result<Vec<f64>, ModelError> {
        if tensor.n_features() != self.input_width {
            return Err(ModelError::WidthMismatch {
                expected: self.input_width,
                actual: tensor.n_features(),
            });
        }
        Ok((0..tensor.n_samples())
            .map(|i| {
                tensor
                    .sample(i)
                    .iter()
                    .zip(&self.weights)
                    .map(|(x, w)| x * w)
                    .sum::<f64>()
                    + self.bias
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_reads_json_artifact() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(br#"{"input_width": 2, "weights": [0.5, -1.0], "bias": 0.25}"#)
            .unwrap();
        let model = LinearModel::load(temp.path()).unwrap();
        assert_eq!(model, LinearModel::new(vec![0.5, -1.0], 0.25));
    }

    #[test]
    fn load_rejects_inconsistent_width() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(br#"{"input_width": 10, "weights": [0.5], "bias": 0.0}"#)
            .unwrap();
        assert!(matches!(
            LinearModel::load(temp.path()),
            Err(ModelError::Malformed(_))
        ));
    }

    #[test]
    fn load_rejects_garbage() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"not json").unwrap();
        assert!(matches!(
            LinearModel::load(temp.path()),
            Err(ModelError::Malformed(_))
        ));
    }
}
