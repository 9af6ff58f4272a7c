use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// ColumnData – the values of one uploaded column
// ---------------------------------------------------------------------------

/// Values of a single column. Missing numeric cells are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether every cell is missing.
    pub fn is_all_missing(&self) -> bool {
        match self {
            ColumnData::Numeric(v) => v.iter().all(|x| x.is_nan()),
            ColumnData::Text(v) => v.iter().all(|x| x.is_none()),
        }
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(v) => Some(v),
            ColumnData::Text(_) => None,
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TableError {
    #[error("column '{name}' has {len} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        len: usize,
        expected: usize,
    },
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),
}

// ---------------------------------------------------------------------------
// DataTable – an uploaded well log
// ---------------------------------------------------------------------------

/// Ordered, equal-length named columns; rows are depth samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    columns: Vec<Column>,
    rows: usize,
}

impl DataTable {
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
            if column.data.len() != rows {
                return Err(TableError::RaggedColumn {
                    name: column.name.clone(),
                    len: column.data.len(),
                    expected: rows,
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn n_rows(&self) -> usize {
        self.rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        self.column(name).and_then(|c| c.data.as_numeric())
    }

    /// Copy of the table without its wholly-empty columns.
    pub fn without_empty_columns(&self) -> DataTable {
        let columns = self
            .columns
            .iter()
            .filter(|c| !c.data.is_all_missing())
            .cloned()
            .collect();
        DataTable {
            columns,
            rows: self.rows,
        }
    }

    /// Copy of the table with each numeric column passed through `f`.
    pub fn map_numeric<F>(&self, mut f: F) -> DataTable
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        let columns = self
            .columns
            .iter()
            .map(|c| match &c.data {
                ColumnData::Numeric(values) => Column::numeric(c.name.clone(), f(values)),
                ColumnData::Text(_) => c.clone(),
            })
            .collect();
        DataTable {
            columns,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        DataTable::new(vec![
            Column::numeric("Depth", vec![1.0, 2.0, 3.0]),
            Column::numeric("Empty", vec![f64::NAN; 3]),
            Column::text("Well", vec![Some("A".into()), None, Some("A".into())]),
            Column::text("Notes", vec![None, None, None]),
        ])
        .unwrap()
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = DataTable::new(vec![
            Column::numeric("Depth", vec![1.0, 2.0]),
            Column::numeric("SGR", vec![1.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            TableError::RaggedColumn {
                name: "SGR".into(),
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let err = DataTable::new(vec![
            Column::numeric("SGR", vec![1.0]),
            Column::numeric("SGR", vec![2.0]),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("SGR".into()));
    }

    #[test]
    fn empty_columns_are_dropped_in_order() {
        let table = sample().without_empty_columns();
        assert_eq!(table.column_names(), vec!["Depth", "Well"]);
        assert_eq!(table.n_rows(), 3);
    }

    #[test]
    fn map_numeric_leaves_text_untouched() {
        let table = sample().map_numeric(|v| v.iter().map(|x| x * 2.0).collect());
        assert_eq!(table.numeric("Depth").unwrap(), &[2.0, 4.0, 6.0]);
        assert_eq!(table.column("Well"), sample().column("Well"));
    }
}
