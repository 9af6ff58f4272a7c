/// Table layer: uploaded well logs and their loaders.
///
/// ```text
///  .csv / .json records
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → DataTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ DataTable │  named Numeric / Text columns, one row per depth sample
///   └───────────┘
/// ```
pub mod loader;
pub mod model;

pub use loader::{from_json_records, load_table, read_csv, LoadError};
pub use model::{Column, ColumnData, DataTable, TableError};
