//! Core Parquet reading functionality

use crate::arrow_conversion::{append_cells, canonicalize, logical_type_for};
use crate::{CellValue, Column, DecodeError, ErrorContext, LogicalType, Result, Table};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ProjectionMask;
use parquet::file::metadata::FileMetaData;
use parquet::file::reader::ChunkReader;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Options controlling how a file is decoded into a [`Table`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    columns: Option<Vec<String>>,
    batch_size: Option<usize>,
}

impl ReaderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only decode the named top-level columns. Output keeps file order.
    pub fn with_columns(mut self, columns: &[String]) -> Self {
        self.columns = Some(columns.to_vec());
        self
    }

    /// Rows per Arrow batch while decoding
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn batch_size(&self) -> Option<usize> {
        self.batch_size
    }
}

/// Parquet reader over any [`ChunkReader`] source (a file, or bytes in memory)
///
/// The footer is parsed on construction, so a truncated or corrupt file is
/// rejected before any row group is touched.
pub struct Reader<R: ChunkReader> {
    builder: ParquetRecordBatchReaderBuilder<R>,
}

impl Reader<File> {
    /// Open the file at `path` and parse its footer
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        Self::new(file).with_context(|| format!("failed to read {}", path.display()))
    }
}

impl<R> Reader<R>
where
    R: ChunkReader + 'static,
{
    /// Create a new reader
    pub fn new(reader: R) -> Result<Self> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let metadata = builder.metadata().file_metadata();
        tracing::debug!(
            rows = metadata.num_rows(),
            row_groups = builder.metadata().num_row_groups(),
            created_by = metadata.created_by().unwrap_or("unknown"),
            "parsed parquet footer"
        );
        Ok(Self { builder })
    }

    /// Get the Parquet file metadata
    pub fn metadata(&self) -> &FileMetaData {
        self.builder.metadata().file_metadata()
    }

    pub fn num_row_groups(&self) -> usize {
        self.builder.metadata().num_row_groups()
    }

    /// Footer row count, checked against the row groups it summarizes
    fn declared_rows(&self) -> Result<usize> {
        let declared = self.metadata().num_rows();
        let mut summed: i64 = 0;
        for (idx, row_group) in self.builder.metadata().row_groups().iter().enumerate() {
            if row_group.num_rows() < 0 {
                return Err(DecodeError::malformed(format!(
                    "row group {} declares {} rows",
                    idx,
                    row_group.num_rows()
                )));
            }
            summed = summed.checked_add(row_group.num_rows()).ok_or_else(|| {
                DecodeError::malformed("row group row counts overflow")
            })?;
        }

        if declared != summed {
            return Err(DecodeError::malformed(format!(
                "footer declares {} rows but its row groups hold {}",
                declared, summed
            )));
        }
        usize::try_from(declared)
            .map_err(|_| DecodeError::malformed(format!("footer declares {} rows", declared)))
    }

    /// Decode every selected column into a [`Table`]
    pub fn read_table(self, options: &ReaderOptions) -> Result<Table> {
        let declared_rows = self.declared_rows()?;

        let arrow_schema = self.builder.schema().clone();
        let column_indices = match options.columns() {
            Some(names) => project(&arrow_schema, names)?,
            None => (0..arrow_schema.fields().len()).collect(),
        };

        // Resolve every type before decoding so unsupported columns fail fast
        let mut columns: Vec<Column> = Vec::with_capacity(column_indices.len());
        for &idx in &column_indices {
            let field = arrow_schema.field(idx);
            if columns.iter().any(|c| c.name.as_ref() == field.name()) {
                return Err(DecodeError::invalid_argument(format!(
                    "column '{}' appears more than once",
                    field.name()
                )));
            }
            let logical_type: LogicalType = logical_type_for(field)?;
            columns.push(Column::new(
                Arc::from(field.name().as_str()),
                logical_type,
                Vec::<CellValue>::new(),
            ));
        }

        // Nothing to decode; every record is empty
        if columns.is_empty() {
            return Table::try_new(columns, declared_rows);
        }

        let mut builder = self.builder;
        if options.columns().is_some() {
            let mask = ProjectionMask::roots(builder.parquet_schema(), column_indices.clone());
            builder = builder.with_projection(mask);
        }
        if let Some(size) = options.batch_size() {
            builder = builder.with_batch_size(size);
        }

        let mut decoded_rows = 0usize;
        for batch in builder.build()? {
            let batch = batch?;
            if batch.num_columns() != columns.len() {
                return Err(DecodeError::malformed(format!(
                    "record batch has {} columns, schema declares {}",
                    batch.num_columns(),
                    columns.len()
                )));
            }

            for (column, array) in columns.iter_mut().zip(batch.columns()) {
                let array = canonicalize(&column.name, array.clone())?;
                append_cells(&column.name, array.as_ref(), &mut column.cells)?;
            }
            decoded_rows += batch.num_rows();
        }

        if decoded_rows != declared_rows {
            return Err(DecodeError::malformed(format!(
                "footer declares {} rows but {} were decoded",
                declared_rows, decoded_rows
            )));
        }

        tracing::debug!(
            rows = decoded_rows,
            columns = columns.len(),
            "decoded parquet table"
        );
        Table::try_new(columns, decoded_rows)
    }
}

/// Indices of the requested columns, in file order
fn project(schema: &arrow_schema::Schema, names: &[String]) -> Result<Vec<usize>> {
    if let Some(missing) = names
        .iter()
        .find(|name| schema.column_with_name(name).is_none())
    {
        return Err(DecodeError::invalid_argument(format!(
            "column '{}' does not exist in the file",
            missing
        )));
    }

    Ok(schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, field)| names.iter().any(|n| n == field.name()))
        .map(|(idx, _)| idx)
        .collect())
}
