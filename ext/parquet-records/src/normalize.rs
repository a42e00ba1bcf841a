//! Row-wise normalization of a decoded [`Table`]
//!
//! [`Records`] walks the table once, front to back, moving each cell out as
//! its row is produced. Every cell maps to a [`NormalizedValue`]; cells the
//! output format cannot carry (NaN, infinities, out-of-range dates) are
//! replaced and reported as a [`NormalizationWarning`] instead of failing.

use crate::decimal::{normalize_decimal128, normalize_decimal256};
use crate::temporal::{self, ColumnZone};
use crate::value::MAX_EXACT_INTEGER;
use crate::{CellValue, Column, LogicalType, NormalizedValue, Table, TimeUnit};
use indexmap::IndexMap;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

/// One output row: column name to value, in table column order
pub type Record = IndexMap<Arc<str>, NormalizedValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarningKind {
    /// NaN or an infinity, emitted as null
    NonFiniteFloat,
    /// Declared zone could not be resolved; rendered in UTC
    UnknownTimezone(String),
    /// Outside the calendar range; emitted as the raw epoch count
    TemporalOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationWarning {
    /// `None` for column-level warnings
    pub row: Option<usize>,
    pub column: Arc<str>,
    pub kind: WarningKind,
}

impl fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::NonFiniteFloat => write!(f, "non-finite float in column '{}'", self.column)?,
            WarningKind::UnknownTimezone(tz) => write!(
                f,
                "unknown timezone '{}' for column '{}', using UTC",
                tz, self.column
            )?,
            WarningKind::TemporalOutOfRange => {
                write!(f, "temporal value out of range in column '{}'", self.column)?
            }
        }
        if let Some(row) = self.row {
            write!(f, " at row {}", row)?;
        }
        Ok(())
    }
}

struct ColumnState {
    name: Arc<str>,
    cells: Vec<CellValue>,
    zone: Option<ColumnZone>,
}

/// Lazy, single-pass sequence of normalized records
pub struct Records {
    columns: Vec<ColumnState>,
    row_count: usize,
    next_row: usize,
    warnings: Vec<NormalizationWarning>,
}

/// Start normalizing `table`; the table is consumed as rows are produced
pub fn normalize(table: Table) -> Records {
    Records::new(table)
}

impl Records {
    pub fn new(table: Table) -> Self {
        let row_count = table.row_count();
        let mut warnings = Vec::new();

        let columns = table
            .into_columns()
            .into_iter()
            .map(|Column { name, logical_type, cells }| {
                let zone = match &logical_type {
                    LogicalType::Timestamp { timezone, .. } => {
                        Some(resolve_zone(&name, timezone.as_deref(), &mut warnings))
                    }
                    _ => None,
                };
                ColumnState { name, cells, zone }
            })
            .collect();

        Self {
            columns,
            row_count,
            next_row: 0,
            warnings,
        }
    }

    /// Column names every record carries, in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_ref())
    }

    /// Warnings recorded for the rows produced so far
    pub fn warnings(&self) -> &[NormalizationWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<NormalizationWarning> {
        std::mem::take(&mut self.warnings)
    }
}

fn resolve_zone(
    column: &Arc<str>,
    timezone: Option<&str>,
    warnings: &mut Vec<NormalizationWarning>,
) -> ColumnZone {
    let Some(name) = timezone else {
        return ColumnZone::utc();
    };

    ColumnZone::parse(name).unwrap_or_else(|| {
        let warning = NormalizationWarning {
            row: None,
            column: column.clone(),
            kind: WarningKind::UnknownTimezone(name.to_string()),
        };
        tracing::warn!("{}", warning);
        warnings.push(warning);
        ColumnZone::utc()
    })
}

impl Iterator for Records {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_row >= self.row_count {
            return None;
        }
        let row = self.next_row;
        self.next_row += 1;

        let mut record = IndexMap::with_capacity(self.columns.len());
        for column in &mut self.columns {
            let cell = std::mem::replace(&mut column.cells[row], CellValue::Null);
            let value = match normalize_cell(cell, column.zone.as_ref()) {
                Ok(value) => value,
                Err((value, kind)) => {
                    let warning = NormalizationWarning {
                        row: Some(row),
                        column: column.name.clone(),
                        kind,
                    };
                    tracing::warn!("{}", warning);
                    self.warnings.push(warning);
                    value
                }
            };
            record.insert(column.name.clone(), value);
        }
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row_count - self.next_row;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Records {}

impl FusedIterator for Records {}

/// Map one cell onto its portable form
///
/// `Err` carries the substituted value together with the reason the cell
/// could not be represented as-is.
pub fn normalize_cell(
    cell: CellValue,
    zone: Option<&ColumnZone>,
) -> Result<NormalizedValue, (NormalizedValue, WarningKind)> {
    let value = match cell {
        CellValue::Null => NormalizedValue::Null,

        CellValue::Int8(v) => integer(i128::from(v)),
        CellValue::Int16(v) => integer(i128::from(v)),
        CellValue::Int32(v) => integer(i128::from(v)),
        CellValue::Int64(v) => integer(i128::from(v)),
        CellValue::UInt8(v) => integer(i128::from(v)),
        CellValue::UInt16(v) => integer(i128::from(v)),
        CellValue::UInt32(v) => integer(i128::from(v)),
        CellValue::UInt64(v) => integer(i128::from(v)),

        CellValue::Float32(v) => return float(f64::from(v.into_inner())),
        CellValue::Float64(v) => return float(v.into_inner()),

        CellValue::Boolean(b) => NormalizedValue::Boolean(b),
        CellValue::String(s) => NormalizedValue::Text(s.to_string()),

        CellValue::Decimal128(v, scale) => normalize_decimal128(v, scale),
        CellValue::Decimal256(v, scale) => normalize_decimal256(&v, scale),

        CellValue::TimestampSecond(v) => return timestamp(v, TimeUnit::Second, zone),
        CellValue::TimestampMillis(v) => return timestamp(v, TimeUnit::Millisecond, zone),
        CellValue::TimestampMicros(v) => return timestamp(v, TimeUnit::Microsecond, zone),
        CellValue::TimestampNanos(v) => return timestamp(v, TimeUnit::Nanosecond, zone),

        CellValue::Date32(days) => {
            return temporal_or_raw(temporal::format_date32(days), i64::from(days))
        }
        CellValue::Date64(millis) => {
            return temporal_or_raw(temporal::format_date64(millis), millis)
        }

        CellValue::TimeSecond(v) => {
            return temporal_or_raw(
                temporal::format_time(i64::from(v), TimeUnit::Second),
                i64::from(v),
            )
        }
        CellValue::TimeMillis(v) => {
            return temporal_or_raw(
                temporal::format_time(i64::from(v), TimeUnit::Millisecond),
                i64::from(v),
            )
        }
        CellValue::TimeMicros(v) => {
            return temporal_or_raw(temporal::format_time(v, TimeUnit::Microsecond), v)
        }
        CellValue::TimeNanos(v) => {
            return temporal_or_raw(temporal::format_time(v, TimeUnit::Nanosecond), v)
        }
    };
    Ok(value)
}

fn integer(v: i128) -> NormalizedValue {
    if v.unsigned_abs() <= MAX_EXACT_INTEGER as u128 {
        NormalizedValue::Number(v as f64)
    } else {
        NormalizedValue::IntegerString(v.to_string())
    }
}

fn float(v: f64) -> Result<NormalizedValue, (NormalizedValue, WarningKind)> {
    if v.is_finite() {
        Ok(NormalizedValue::Number(v))
    } else {
        Err((NormalizedValue::Null, WarningKind::NonFiniteFloat))
    }
}

fn timestamp(
    value: i64,
    unit: TimeUnit,
    zone: Option<&ColumnZone>,
) -> Result<NormalizedValue, (NormalizedValue, WarningKind)> {
    let formatted = temporal::to_timestamp(value, unit).map(|ts| match zone {
        Some(zone) => temporal::format_timestamp(ts, zone, unit),
        None => temporal::format_timestamp(ts, &ColumnZone::utc(), unit),
    });
    temporal_or_raw(formatted, value)
}

fn temporal_or_raw(
    formatted: Option<String>,
    raw: i64,
) -> Result<NormalizedValue, (NormalizedValue, WarningKind)> {
    match formatted {
        Some(text) => Ok(NormalizedValue::Timestamp(text)),
        None => Err((
            NormalizedValue::IntegerString(raw.to_string()),
            WarningKind::TemporalOutOfRange,
        )),
    }
}
