//! One-call conversion from a Parquet source to normalized records

use crate::normalize::{normalize, Records};
use crate::{Reader, ReaderOptions, Result, Table};
use bytes::Bytes;
use std::path::Path;

/// A fully decoded file, ready to be normalized row by row
///
/// Decoding finishes before a `Conversion` exists, so any [`DecodeError`]
/// surfaces before the first record is produced.
///
/// [`DecodeError`]: crate::DecodeError
#[derive(Debug)]
pub struct Conversion {
    table: Table,
}

impl Conversion {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    pub fn into_records(self) -> Records {
        normalize(self.table)
    }
}

/// Decode the Parquet file at `path`
pub fn convert_path<P: AsRef<Path>>(path: P, options: &ReaderOptions) -> Result<Conversion> {
    let table = Reader::open(path)?.read_table(options)?;
    Ok(Conversion { table })
}

/// Decode a Parquet file held in memory
pub fn convert_bytes(data: Bytes, options: &ReaderOptions) -> Result<Conversion> {
    let table = Reader::new(data)?.read_table(options)?;
    Ok(Conversion { table })
}
