use anyhow::{bail, Context};
use clap::Parser;
use generator::profile::{build_well_log, GeneratorConfig};
use presenter::bridge::PresenterBridge;
use presenter::export::export_predictions;
use presenter::model::PresentationModel;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use swcore::prelude::{DEFAULT_ALPHA, DEFAULT_WELL_NUMBER};
use swcore::table::load_table;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::{WorkflowConfig, DEFAULT_MODEL_PATH, DEFAULT_OUTPUT_PATH};
use workflow::runner::Runner;

mod generator;
mod presenter;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Predict water saturation (SW-PC) from a well-log table")]
struct Args {
    /// Well-log table to run (.csv or .json records)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Run a synthetic well log with this many depth samples instead of a file
    #[arg(long)]
    synthetic: Option<usize>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Load a workflow config from YAML (overrides the flags below)
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    alpha: f64,
    #[arg(long, default_value_t = DEFAULT_WELL_NUMBER)]
    well_number: f64,
    /// Zero out constant columns instead of aborting on them
    #[arg(long, default_value_t = false)]
    allow_degenerate: bool,
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Keep the presenter bridge alive for incoming well logs
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.model.clone(),
            args.output.clone(),
            args.alpha,
            args.well_number,
            args.allow_degenerate,
        )
    };
    if let Some(bind) = args.bind {
        workflow_config.bind = bind;
    }

    let table = match (&args.input, args.synthetic) {
        (Some(path), _) => Some(
            load_table(path).with_context(|| format!("loading well log {}", path.display()))?,
        ),
        (None, Some(rows)) => Some(build_well_log(&GeneratorConfig {
            rows,
            seed: args.seed,
            ..Default::default()
        })?),
        (None, None) => None,
    };
    if table.is_none() && !args.serve {
        bail!("nothing to do: pass --input, --synthetic or --serve");
    }

    let runner = Arc::new(Runner::new(workflow_config.clone())?);
    let bridge = PresenterBridge::new();

    if let Some(table) = table {
        let result = runner.execute(&table)?;
        let features = &result.prepared.features;
        println!(
            "Prepared {} rows -> features {:?}, tensor {:?}",
            features.n_rows(),
            features.values().dim(),
            result.prepared.tensor.shape()
        );

        let model = PresentationModel::from_result(&result, &runner.metrics());
        bridge.publish(&model);

        match result.prediction {
            Ok(prediction) => {
                export_predictions(&workflow_config.output, &prediction.values)?;
                bridge.publish_status(&format!(
                    "{} SW-PC predictions written to {}",
                    prediction.values.len(),
                    workflow_config.output.display()
                ));
                if let Some(mismatch) = prediction.profile.mismatch {
                    bridge.publish_status(&format!(
                        "warning: depth has {} samples, predictions {}",
                        mismatch.depth_len, mismatch.prediction_len
                    ));
                }
            }
            Err(err) => {
                bridge.publish_status(&format!("prediction failed: {}", err));
                if !args.serve {
                    return Err(err).context("running model");
                }
            }
        }
    }

    if args.serve {
        let bind = workflow_config.bind;
        bridge.serve(runner.clone(), bind);
        bridge.publish_status(&format!("HTTP bridge on {} (Ctrl+C to stop)...", bind));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    let metrics = runner.metrics();
    log::info!(
        "runs completed {}, failed {}, rows predicted {}",
        metrics.completed,
        metrics.failed,
        metrics.rows_predicted
    );
    Ok(())
}
