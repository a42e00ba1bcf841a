//! Column-oriented in-memory table produced by the reader

use crate::{CellValue, DecodeError, LogicalType, Result};
use std::sync::Arc;

/// A named column with its declared type and one cell per row
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: Arc<str>,
    pub logical_type: LogicalType,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new<N: Into<Arc<str>>>(name: N, logical_type: LogicalType, cells: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            logical_type,
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Count of cells with the null indicator set
    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }
}

/// Ordered columns sharing a single row count
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, rejecting columns of unequal length
    pub fn try_new(columns: Vec<Column>, row_count: usize) -> Result<Self> {
        if let Some(ragged) = columns.iter().find(|c| c.len() != row_count) {
            return Err(DecodeError::malformed(format!(
                "column '{}' has {} values but the table has {} rows",
                ragged.name,
                ragged.len(),
                row_count
            )));
        }
        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.as_ref() == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_ref())
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
