pub mod features;
pub mod predict;
pub mod scaling;
pub mod smooth;
pub mod tensor;
pub mod validate;

pub use features::{FeatureEngineer, FeatureTable};
pub use predict::{DepthProfile, LengthMismatch, PredictionVector, Predictor};
pub use scaling::{
    DegeneratePolicy, FitScope, ReferenceStatistics, ScaledPair, ScaledTable, ScalerPair,
    ScalingMethod,
};
pub use smooth::{SmoothedTable, Smoother};
pub use tensor::{InputTensor, TensorShaper};
pub use validate::{ColumnValidator, ValidatedTable};
