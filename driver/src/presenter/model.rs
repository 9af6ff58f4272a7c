use crate::presenter::tracks::{build_tracks, LogTrack};
use crate::workflow::runner::WorkflowResult;
use serde::{Deserialize, Serialize};
use swcore::processing::DepthProfile;
use swcore::telemetry::MetricsSnapshot;

/// Everything a plotting front end needs for one run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PresentationModel {
    pub predictions: Vec<f64>,
    pub depth_profile: Option<DepthProfile>,
    pub tracks: Vec<LogTrack>,
    pub depth_axis_inverted: bool,
    pub error: Option<String>,
    pub notes: Vec<String>,
}

impl PresentationModel {
    pub fn from_result(result: &WorkflowResult, metrics: &MetricsSnapshot) -> Self {
        let prepared = &result.prepared;
        let mut notes = vec![
            format!(
                "{} rows, {} columns after cleaning",
                prepared.validated.table().n_rows(),
                prepared.validated.table().n_cols()
            ),
            format!(
                "runs completed {}, failed {}, rows predicted {}",
                metrics.completed, metrics.failed, metrics.rows_predicted
            ),
        ];

        let (predictions, depth_profile, error) = match &result.prediction {
            Ok(prediction) => {
                if let Some(mismatch) = prediction.profile.mismatch {
                    notes.push(format!(
                        "depth length {} differs from prediction length {}",
                        mismatch.depth_len, mismatch.prediction_len
                    ));
                }
                (
                    prediction.values.values().to_vec(),
                    Some(prediction.profile.clone()),
                    None,
                )
            }
            Err(err) => (Vec::new(), None, Some(err.to_string())),
        };

        Self {
            predictions,
            depth_profile,
            tracks: build_tracks(prepared),
            depth_axis_inverted: true,
            error,
            notes,
        }
    }
}
