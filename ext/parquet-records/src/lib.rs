//! Parquet to portable records
//!
//! `parquet-records` decodes an Apache Parquet file into an in-memory,
//! column-oriented [`Table`] and then transposes it into row-oriented
//! [`Record`]s whose values are safe to hand to any serializer.
//!
//! # Key Components
//!
//! - **Reader**: footer parsing and column decoding through the parquet-rs
//!   Arrow reader, with optional column projection ([`ReaderOptions`])
//! - **Table**: named, typed columns of [`CellValue`]s with a shared row count
//! - **Normalizer**: a lazy [`Records`] iterator that rewrites each cell into a
//!   [`NormalizedValue`]
//!   - Decimals stay exact: numbers only when the f64 prints back to the same
//!     digits, digit strings otherwise
//!   - Integers beyond 2^53 become digit strings
//!   - NaN and infinities become null and are reported as warnings
//!   - Timestamps, dates and times become ISO-8601 strings
//!
//! # Example Usage
//!
//! ```no_run
//! use parquet_records::{convert_path, ReaderOptions};
//!
//! let conversion = convert_path("data.parquet", &ReaderOptions::new())?;
//! for record in conversion.into_records() {
//!     println!("{}", serde_json::to_string(&record).unwrap());
//! }
//! # Ok::<(), parquet_records::DecodeError>(())
//! ```

pub mod arrow_conversion;
pub mod convert;
pub mod decimal;
pub mod error;
pub mod normalize;
pub mod reader;
pub mod schema;
pub mod table;
pub mod temporal;
pub mod value;

pub use convert::{convert_bytes, convert_path, Conversion};
pub use error::{DecodeError, ErrorContext, Result};
pub use normalize::{normalize, NormalizationWarning, Record, Records, WarningKind};
pub use reader::{Reader, ReaderOptions};
pub use schema::{LogicalType, TimeUnit};
pub use table::{Column, Table};
pub use value::{CellValue, NormalizedValue};
