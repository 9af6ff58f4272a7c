//! Seam between the pipeline and a pretrained regression model.
//!
//! The pipeline only relies on [`RegressionModel::predict`]; artifact formats
//! live behind it.

pub mod linear;

use std::path::{Path, PathBuf};

use crate::processing::tensor::InputTensor;

pub use linear::LinearModel;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("model artifact not found: {}", .0.display())]
    ArtifactMissing(PathBuf),
    #[error("unsupported model artifact: {}", .0.display())]
    UnsupportedArtifact(PathBuf),
    #[error("malformed model artifact: {0}")]
    Malformed(String),
    #[error("model expects {expected} input features, tensor has {actual}")]
    WidthMismatch { expected: usize, actual: usize },
    #[error("model returned {actual} predictions for {expected} samples")]
    OutputLength { expected: usize, actual: usize },
    #[error("model runtime failure: {0}")]
    Runtime(String),
}

/// A loaded model that maps `(samples, features, 1)` to one scalar per sample.
pub trait RegressionModel: Send + Sync {
    /// Feature count the model was trained on, when the artifact declares it.
    fn input_width(&self) -> Option<usize> {
        None
    }

    fn predict(&self, tensor: &InputTensor) -> Result<Vec<f64>, ModelError>;
}

/// Load a model artifact.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – [`LinearModel`] weights
pub fn load_model(path: &Path) -> Result<Box<dyn RegressionModel>, ModelError> {
    if !path.exists() {
        return Err(ModelError::ArtifactMissing(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => Ok(Box::new(LinearModel::load(path)?)),
        _ => Err(ModelError::UnsupportedArtifact(path.to_path_buf())),
    }
}
