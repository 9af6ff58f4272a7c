use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use super::model::{Column, ColumnData, DataTable, TableError};

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("row {row} is not a JSON object")]
    NotAnObject { row: usize },
    #[error("expected a top-level JSON array of records")]
    NotAnArray,
    #[error(transparent)]
    Table(#[from] TableError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a well-log table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, one depth sample per record
/// * `.json` – `[{ "Depth": 1500.0, "zone": 2, ... }, ...]`
pub fn load_table(path: &Path) -> Result<DataTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let root: JsonValue = serde_json::from_str(&text)?;
            let records = root.as_array().ok_or(LoadError::NotAnArray)?;
            from_json_records(records)
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Read CSV from any reader. A column is numeric when every non-empty cell
/// parses as a float; empty cells become `NaN`. Anything else stays text.
pub fn read_csv<R: std::io::Read>(reader: R) -> Result<DataTable, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(idx).unwrap_or("").trim().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| Column {
            name,
            data: infer_column(raw),
        })
        .collect();

    Ok(DataTable::new(columns)?)
}

fn infer_column(raw: Vec<String>) -> ColumnData {
    let parsed: Option<Vec<f64>> = raw
        .iter()
        .map(|cell| {
            if cell.is_empty() {
                Some(f64::NAN)
            } else {
                cell.parse::<f64>().ok()
            }
        })
        .collect();

    match parsed {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Text(
            raw.into_iter()
                .map(|cell| if cell.is_empty() { None } else { Some(cell) })
                .collect(),
        ),
    }
}

// ---------------------------------------------------------------------------
// JSON records
// ---------------------------------------------------------------------------

/// Build a table from records-oriented JSON. Column order follows first
/// appearance; keys absent from a record are missing cells.
pub fn from_json_records(records: &[JsonValue]) -> Result<DataTable, LoadError> {
    let mut names: Vec<String> = Vec::new();
    for (row, record) in records.iter().enumerate() {
        let obj = record.as_object().ok_or(LoadError::NotAnObject { row })?;
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values: Vec<Option<&JsonValue>> = records
                .iter()
                .map(|r| r.get(&name).filter(|v| !v.is_null()))
                .collect();
            let numeric = values.iter().all(|v| v.map_or(true, |v| v.is_number()));
            let data = if numeric {
                ColumnData::Numeric(
                    values
                        .iter()
                        .map(|v| v.and_then(|v| v.as_f64()).unwrap_or(f64::NAN))
                        .collect(),
                )
            } else {
                ColumnData::Text(
                    values
                        .iter()
                        .map(|v| {
                            v.map(|v| match v {
                                JsonValue::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                        })
                        .collect(),
                )
            };
            Column { name, data }
        })
        .collect();

    Ok(DataTable::new(columns)?)
}
