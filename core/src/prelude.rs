use serde::{Deserialize, Serialize};

use crate::inference::ModelError;
use crate::processing::scaling::{DegeneratePolicy, FitScope};

/// Default EWMA smoothing factor applied to every numeric log curve.
pub const DEFAULT_ALPHA: f64 = 0.6;
/// Well identifier the model was trained with for this field.
pub const DEFAULT_WELL_NUMBER: f64 = 5.0;

/// How EWMA weights are normalised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EwmaWeighting {
    /// Weighted mean of all samples so far, newest weight 1, older weights (1-α)^k.
    #[default]
    Adjusted,
    /// `y_t = α·x_t + (1-α)·y_{t-1}`.
    Recursive,
}

/// Shared configuration for the pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub alpha: f64,
    pub weighting: EwmaWeighting,
    pub well_number: f64,
    pub fit_scope: FitScope,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            weighting: EwmaWeighting::Adjusted,
            well_number: DEFAULT_WELL_NUMBER,
            fit_scope: FitScope::SelfFit,
            degenerate_policy: DegeneratePolicy::Abort,
        }
    }
}

/// Common error type for stage execution.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("column '{column}' has zero variance and cannot be standardized")]
    DegenerateColumn { column: String },
    #[error("cannot shape a {rows}x{cols} table into a model tensor")]
    Shape { rows: usize, cols: usize },
    #[error("model invocation failed: {0}")]
    ModelInvocation(#[source] ModelError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type StageResult<T> = Result<T, StageError>;

/// A single step of the well-log pipeline.
///
/// Stages borrow their input and hand back a freshly built output, so every
/// intermediate table stays inspectable after the run.
pub trait ProcessingStage {
    type Input;
    type Output;

    fn name(&self) -> &'static str;
    fn execute(&mut self, input: &Self::Input) -> StageResult<Self::Output>;
    fn cleanup(&mut self) {}
}
