use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use swcore::prelude::PipelineConfig;
use swcore::processing::DegeneratePolicy;

pub const DEFAULT_MODEL_PATH: &str = "models/sw_pc_linear.json";
pub const DEFAULT_OUTPUT_PATH: &str = "SW-PC_Predictions.csv";

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub model: PathBuf,
    pub output: PathBuf,
    pub bind: SocketAddr,
    pub pipeline: PipelineConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            bind: default_bind_address(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        model: PathBuf,
        output: PathBuf,
        alpha: f64,
        well_number: f64,
        allow_degenerate: bool,
    ) -> Self {
        let degenerate_policy = if allow_degenerate {
            DegeneratePolicy::UnitScale
        } else {
            DegeneratePolicy::Abort
        };
        Self {
            model,
            output,
            pipeline: PipelineConfig {
                alpha,
                well_number,
                degenerate_policy,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn to_pipeline_config(&self) -> PipelineConfig {
        self.pipeline.clone()
    }
}
