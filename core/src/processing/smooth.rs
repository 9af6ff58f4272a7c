use crate::math::stats::StatsHelper;
use crate::prelude::{EwmaWeighting, ProcessingStage, StageError, StageResult};
use crate::processing::validate::ValidatedTable;
use crate::table::DataTable;
use crate::telemetry::log::LogManager;

/// Validated table with every numeric curve smoothed.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedTable(DataTable);

impl SmoothedTable {
    pub fn table(&self) -> &DataTable {
        &self.0
    }
}

/// EWMA smoothing applied independently to each numeric column.
///
/// Rows are assumed to be in depth order already; monotonicity is not checked.
pub struct Smoother {
    alpha: f64,
    weighting: EwmaWeighting,
    logger: LogManager,
}

impl Smoother {
    pub fn new(alpha: f64, weighting: EwmaWeighting) -> StageResult<Self> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(StageError::InvalidConfig(format!(
                "smoothing factor {} outside (0, 1]",
                alpha
            )));
        }
        Ok(Self {
            alpha,
            weighting,
            logger: LogManager::new("smooth"),
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl ProcessingStage for Smoother {
    type Input = ValidatedTable;
    type Output = SmoothedTable;

    fn name(&self) -> &'static str {
        "smoother"
    }

    fn execute(&mut self, input: &ValidatedTable) -> StageResult<SmoothedTable> {
        let (alpha, weighting) = (self.alpha, self.weighting);
        let mut smoothed_columns = 0;
        let table = input.table().map_numeric(|values| {
            smoothed_columns += 1;
            StatsHelper::ewma(values, alpha, weighting)
        });

        self.logger.record(&format!(
            "alpha {:.2} ({:?}) over {} numeric column(s)",
            alpha, weighting, smoothed_columns
        ));
        Ok(SmoothedTable(table))
    }
}
