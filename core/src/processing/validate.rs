use crate::prelude::{ProcessingStage, StageError, StageResult};
use crate::schema::InputColumn;
use crate::table::DataTable;
use crate::telemetry::log::LogManager;

/// Upload with empty columns removed and every required curve present.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTable(DataTable);

impl ValidatedTable {
    pub fn table(&self) -> &DataTable {
        &self.0
    }
}

/// Drops wholly-empty columns and checks the required curve set.
pub struct ColumnValidator {
    logger: LogManager,
}

impl ColumnValidator {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("validate"),
        }
    }
}

impl Default for ColumnValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessingStage for ColumnValidator {
    type Input = DataTable;
    type Output = ValidatedTable;

    fn name(&self) -> &'static str {
        "column validator"
    }

    fn execute(&mut self, input: &DataTable) -> StageResult<ValidatedTable> {
        let table = input.without_empty_columns();
        let dropped = input.n_cols() - table.n_cols();
        if dropped > 0 {
            self.logger.record(&format!("dropped {} empty column(s)", dropped));
        }

        let missing: Vec<String> = InputColumn::ALL
            .iter()
            .filter(|c| !table.contains(c.name()))
            .map(|c| c.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StageError::MissingColumns(missing));
        }

        self.logger.record(&format!(
            "{} rows x {} columns accepted",
            table.n_rows(),
            table.n_cols()
        ));
        Ok(ValidatedTable(table))
    }
}
