//! Export file writers

use super::{ExportError, ExportResult, Table};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Local, TimeZone};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use crate::types::{JsonObject, JsonValue};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
    Parquet,
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// `<prefix><entity>_<YYYYmmdd_HHMMSS>.<ext>` for a given timestamp
pub fn export_file_name<Tz: TimeZone>(
    prefix: &str,
    entity: &str,
    format: ExportFormat,
    at: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{prefix}{entity}_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Export file name stamped with the local time
pub fn default_file_name(prefix: &str, entity: &str, format: ExportFormat) -> String {
    export_file_name(prefix, entity, format, &Local::now())
}

/// Write models as a pretty-printed JSON array
pub fn write_json<M: Serialize>(path: impl AsRef<Path>, models: &[M]) -> ExportResult<usize> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut out, models)?;
    out.flush()?;
    info!("Wrote {} records to {}", models.len(), path.as_ref().display());
    Ok(models.len())
}

/// One all-string record batch holding the table
pub fn table_to_batch(table: &Table) -> ExportResult<RecordBatch> {
    if table.headers().is_empty() {
        return Err(ExportError::Empty(format!("table '{}' has no columns", table.name())));
    }

    let fields: Vec<Field> = table
        .headers()
        .iter()
        .map(|h| Field::new(h.as_str(), DataType::Utf8, false))
        .collect();
    let columns: Vec<ArrayRef> = (0..table.headers().len())
        .map(|column| {
            let cells = table.rows().iter().map(|row| row[column].as_str());
            Arc::new(StringArray::from_iter_values(cells)) as ArrayRef
        })
        .collect();

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Write a table as CSV with a header row
pub fn write_csv(path: impl AsRef<Path>, table: &Table) -> ExportResult<usize> {
    let batch = table_to_batch(table)?;
    let file = File::create(path.as_ref())?;
    let mut writer = arrow::csv::WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer.write(&batch)?;
    writer.into_inner().flush()?;
    info!("Wrote {} rows to {}", table.len(), path.as_ref().display());
    Ok(table.len())
}

/// Configuration for the Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024,
        }
    }
}

impl ParquetWriterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Write a table as a Parquet file of string columns
pub fn write_parquet(
    path: impl AsRef<Path>,
    table: &Table,
    config: Option<&ParquetWriterConfig>,
) -> ExportResult<usize> {
    let default_config = ParquetWriterConfig::default();
    let config = config.unwrap_or(&default_config);

    let batch = table_to_batch(table)?;
    let file = File::create(path.as_ref())?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(config.build_properties()))?;
    writer.write(&batch)?;
    writer.close()?;
    info!("Wrote {} rows to {}", table.len(), path.as_ref().display());
    Ok(table.len())
}

/// Write each table to `<dir>/<table name>.<ext>`, creating `dir`.
///
/// Table names must be unique; a second table with a taken file name is
/// rejected rather than overwriting the first.
pub fn write_tables(dir: impl AsRef<Path>, tables: &[Table], format: ExportFormat) -> ExportResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(format!("{}.{}", table.name(), format.extension()));
        if written.contains(&path) {
            return Err(ExportError::DuplicateTable(path.display().to_string()));
        }
        match format {
            ExportFormat::Json => {
                let rows: Vec<JsonObject> = table
                    .rows()
                    .iter()
                    .map(|row| {
                        table
                            .headers()
                            .iter()
                            .cloned()
                            .zip(row.iter().cloned().map(JsonValue::String))
                            .collect()
                    })
                    .collect();
                write_json(&path, &rows)?;
            }
            ExportFormat::Csv => {
                write_csv(&path, table)?;
            }
            ExportFormat::Parquet => {
                write_parquet(&path, table, None)?;
            }
        }
        written.push(path);
    }
    Ok(written)
}
