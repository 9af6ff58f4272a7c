use ndarray::{Array2, ArrayView1};

use crate::math::transform::log_or_zero_column;
use crate::prelude::{ProcessingStage, StageError, StageResult};
use crate::processing::smooth::SmoothedTable;
use crate::schema::{FeatureColumn, FeatureSource, InputColumn};
use crate::table::{ColumnData, DataTable};
use crate::telemetry::log::LogManager;

/// Engineered model features, one row per depth sample, columns in
/// [`FeatureColumn::SCHEMA`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    values: Array2<f64>,
}

impl FeatureTable {
    /// Wrap a `(rows, 10)` matrix already laid out in schema order.
    pub fn from_values(values: Array2<f64>) -> StageResult<Self> {
        if values.ncols() != FeatureColumn::WIDTH {
            return Err(StageError::SchemaMismatch(format!(
                "feature table needs {} columns, got {}",
                FeatureColumn::WIDTH,
                values.ncols()
            )));
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn column(&self, column: FeatureColumn) -> ArrayView1<'_, f64> {
        self.values.column(column.index())
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        FeatureColumn::names()
    }
}

/// Derives the model feature table from the smoothed curves.
pub struct FeatureEngineer {
    well_number: f64,
    logger: LogManager,
}

impl FeatureEngineer {
    pub fn new(well_number: f64) -> Self {
        Self {
            well_number,
            logger: LogManager::new("features"),
        }
    }

    fn source_column<'a>(table: &'a DataTable, input: InputColumn) -> StageResult<&'a [f64]> {
        let column = table.column(input.name()).ok_or_else(|| {
            StageError::SchemaMismatch(format!("source column '{}' is absent", input))
        })?;
        match &column.data {
            ColumnData::Numeric(values) => Ok(values),
            ColumnData::Text(_) => Err(StageError::SchemaMismatch(format!(
                "source column '{}' is not numeric",
                input
            ))),
        }
    }
}

impl ProcessingStage for FeatureEngineer {
    type Input = SmoothedTable;
    type Output = FeatureTable;

    fn name(&self) -> &'static str {
        "feature engineer"
    }

    fn execute(&mut self, input: &SmoothedTable) -> StageResult<FeatureTable> {
        let table = input.table();
        let rows = table.n_rows();

        // Resolve every source first so schema drift fails before any work.
        for required in InputColumn::ALL {
            Self::source_column(table, required)?;
        }

        let mut values = Array2::<f64>::zeros((rows, FeatureColumn::WIDTH));
        for feature in FeatureColumn::SCHEMA {
            let column: Vec<f64> = match feature.source() {
                FeatureSource::WellConstant => vec![self.well_number; rows],
                FeatureSource::RowIndex => (0..rows).map(|i| i as f64).collect(),
                FeatureSource::Copied(input) => Self::source_column(table, input)?.to_vec(),
                FeatureSource::LogOf(input) => {
                    log_or_zero_column(Self::source_column(table, input)?)
                }
            };
            values
                .column_mut(feature.index())
                .assign(&ArrayView1::from(&column[..]));
        }

        self.logger.record(&format!(
            "{} rows -> [{}]",
            rows,
            FeatureColumn::names().join(", ")
        ));
        FeatureTable::from_values(values)
    }
}
