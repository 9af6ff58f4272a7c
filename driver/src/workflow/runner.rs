use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use std::sync::Arc;
use swcore::inference::load_model;
use swcore::prelude::{StageError, StageResult};
use swcore::processing::{DepthProfile, PredictionVector};
use swcore::table::DataTable;
use swcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use swcore::{Pipeline, PreparedRun};

pub struct Prediction {
    pub values: PredictionVector,
    pub profile: DepthProfile,
}

/// Outcome of one run. Model failures leave the prepared tables intact.
pub struct WorkflowResult {
    pub prepared: PreparedRun,
    pub prediction: StageResult<Prediction>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    pipeline: Pipeline,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        let pipeline =
            Pipeline::new(config.to_pipeline_config()).context("building pipeline")?;
        Ok(Self {
            config,
            pipeline,
            metrics: Arc::new(MetricsRecorder::new()),
        })
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn execute(&self, table: &DataTable) -> anyhow::Result<WorkflowResult> {
        let prepared = match self.pipeline.prepare(table) {
            Ok(prepared) => prepared,
            Err(err) => {
                self.metrics.record_failure();
                return Err(err).context("preparing model input");
            }
        };

        // The artifact is loaded per run and dropped once predictions exist.
        let prediction = load_model(&self.config.model)
            .map_err(StageError::ModelInvocation)
            .and_then(|model| self.pipeline.predict(&prepared, model))
            .map(|values| Prediction {
                profile: prepared.depth_profile(&values),
                values,
            });

        match &prediction {
            Ok(p) => self.metrics.record_completed(p.values.len()),
            Err(err) => {
                log::error!("prediction failed: {}", err);
                self.metrics.record_failure();
            }
        }

        Ok(WorkflowResult {
            prepared,
            prediction,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::generator::profile::{build_well_log, GeneratorConfig};
    use std::io::Write;
    use std::path::PathBuf;
    use swcore::inference::LinearModel;
    use tempfile::NamedTempFile;

    pub(crate) fn model_file() -> NamedTempFile {
        let mut temp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let model = LinearModel::new(
            vec![0.0, 0.02, 0.01, -0.01, 0.03, 0.12, -0.05, -0.07, -0.06, 0.02],
            0.45,
        );
        temp.write_all(serde_json::to_string(&model).unwrap().as_bytes())
            .unwrap();
        temp
    }

    pub(crate) fn config_for(model: &NamedTempFile) -> WorkflowConfig {
        WorkflowConfig::from_args(
            model.path().to_path_buf(),
            PathBuf::from("unused.csv"),
            0.6,
            5.0,
            false,
        )
    }

    #[test]
    fn runner_executes_workflow() {
        let model = model_file();
        let runner = Runner::new(config_for(&model)).unwrap();
        let table = build_well_log(&GeneratorConfig {
            rows: 64,
            ..Default::default()
        })
        .unwrap();

        let result = runner.execute(&table).unwrap();
        let prediction = result.prediction.as_ref().unwrap();
        assert_eq!(prediction.values.len(), 64);
        assert_eq!(prediction.profile.len(), 64);
        assert_eq!(result.prepared.tensor.shape(), (64, 10, 1));
        assert_eq!(runner.metrics().completed, 1);
        assert_eq!(runner.metrics().rows_predicted, 64);
    }

    #[test]
    fn missing_model_keeps_prepared_tables() {
        let cfg = WorkflowConfig::from_args(
            PathBuf::from("no/such/model.json"),
            PathBuf::from("unused.csv"),
            0.6,
            5.0,
            false,
        );
        let runner = Runner::new(cfg).unwrap();
        let table = build_well_log(&GeneratorConfig {
            rows: 16,
            ..Default::default()
        })
        .unwrap();

        let result = runner.execute(&table).unwrap();
        assert!(matches!(
            result.prediction,
            Err(StageError::ModelInvocation(_))
        ));
        assert_eq!(result.prepared.features.n_rows(), 16);
        assert_eq!(runner.metrics().failed, 1);
    }

    #[test]
    fn schema_failure_is_an_error() {
        let model = model_file();
        let runner = Runner::new(config_for(&model)).unwrap();
        let table = DataTable::new(vec![swcore::table::Column::numeric(
            "Depth",
            vec![1.0, 2.0],
        )])
        .unwrap();

        let err = runner.execute(&table).err().unwrap();
        assert!(format!("{err:#}").contains("missing required columns"));
        assert_eq!(runner.metrics().failed, 1);
    }
}
