//! Preprocessing and inference core for well-log water saturation (SW-PC)
//! prediction.
//!
//! Stages run strictly in order and each hands a fresh, immutable table to
//! the next: validate, smooth, engineer features, scale, shape the tensor,
//! predict. The feature column order is fixed by [`schema::FeatureColumn`].

pub mod inference;
pub mod math;
pub mod pipeline;
pub mod prelude;
pub mod processing;
pub mod schema;
pub mod table;
pub mod telemetry;

pub use pipeline::{Pipeline, PreparedRun};
pub use prelude::{PipelineConfig, ProcessingStage, StageError, StageResult};
