//! Tabular export
//!
//! Shapes typed models into string [`Table`]s and writes them as JSON, CSV
//! or Parquet files.
//!
//! # Overview
//!
//! - Nested objects flatten into `.`-joined column names
//! - Arrays become compact JSON cells, null becomes an empty cell
//! - Shop products can be split into one table per category

mod table;
mod writer;

pub use table::{
    group_products_by_category, sanitize_sheet_name, unique_sheet_name, Table, DEFAULT_SHEET_NAME,
    MAX_SHEET_NAME_LEN, NO_CATEGORY,
};
pub use writer::{
    default_file_name, export_file_name, table_to_batch, write_csv, write_json, write_parquet,
    write_tables, ExportFormat, ParquetWriterConfig,
};

use thiserror::Error;

/// Errors raised while writing export files
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Nothing to export: {0}")]
    Empty(String),

    #[error("Two tables would be written to {0}")]
    DuplicateTable(String),
}

/// Result type for export operations
pub type ExportResult<T> = std::result::Result<T, ExportError>;
