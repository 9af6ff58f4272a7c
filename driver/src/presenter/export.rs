use anyhow::Context;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use swcore::processing::PredictionVector;

pub const PREDICTION_HEADER: &str = "Predicted SW-PC";

/// Single-column prediction table for download.
pub fn write_predictions<W: Write>(
    writer: W,
    predictions: &PredictionVector,
) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([PREDICTION_HEADER])?;
    for value in predictions.values() {
        csv_writer.write_record([value.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_predictions(path: &Path, predictions: &PredictionVector) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_predictions(file, predictions)
        .with_context(|| format!("writing predictions to {}", path.display()))
}
