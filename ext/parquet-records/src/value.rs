use num::BigInt;
use ordered_float::OrderedFloat;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Largest decimal magnitude treated as an exact number (2^53 - 1)
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Largest integer magnitude an f64 mantissa holds exactly (2^53)
pub const MAX_EXACT_INTEGER: i64 = 1 << 53;

/// A single decoded cell, one variant per scalar the decoder produces
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellValue {
    // Numeric types
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(OrderedFloat<f32>),
    Float64(OrderedFloat<f64>),

    // Basic types
    Boolean(bool),
    String(Arc<str>),

    // Decimal types
    Decimal128(i128, i8),   // unscaled value, scale
    Decimal256(BigInt, i8), // unscaled value, scale

    // Timestamps since the epoch; the zone lives on the column type
    TimestampSecond(i64),
    TimestampMillis(i64),
    TimestampMicros(i64),
    TimestampNanos(i64),

    // Date/Time types
    Date32(i32), // Days since epoch
    Date64(i64), // Milliseconds since epoch
    TimeSecond(i32),
    TimeMillis(i32),
    TimeMicros(i64),
    TimeNanos(i64),

    Null,
}

impl CellValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Get the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Int8(_) => "Int8",
            CellValue::Int16(_) => "Int16",
            CellValue::Int32(_) => "Int32",
            CellValue::Int64(_) => "Int64",
            CellValue::UInt8(_) => "UInt8",
            CellValue::UInt16(_) => "UInt16",
            CellValue::UInt32(_) => "UInt32",
            CellValue::UInt64(_) => "UInt64",
            CellValue::Float32(_) => "Float32",
            CellValue::Float64(_) => "Float64",
            CellValue::Boolean(_) => "Boolean",
            CellValue::String(_) => "String",
            CellValue::Decimal128(_, _) => "Decimal128",
            CellValue::Decimal256(_, _) => "Decimal256",
            CellValue::TimestampSecond(_) => "TimestampSecond",
            CellValue::TimestampMillis(_) => "TimestampMillis",
            CellValue::TimestampMicros(_) => "TimestampMicros",
            CellValue::TimestampNanos(_) => "TimestampNanos",
            CellValue::Date32(_) => "Date32",
            CellValue::Date64(_) => "Date64",
            CellValue::TimeSecond(_) => "TimeSecond",
            CellValue::TimeMillis(_) => "TimeMillis",
            CellValue::TimeMicros(_) => "TimeMicros",
            CellValue::TimeNanos(_) => "TimeNanos",
            CellValue::Null => "Null",
        }
    }
}

/// Portable scalar every cell is rewritten into before serialization
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue {
    Null,
    Number(f64),
    /// Decimal digits that would lose precision as an f64
    IntegerString(String),
    Text(String),
    Boolean(bool),
    /// ISO-8601 date, time, or date-time
    Timestamp(String),
}

impl NormalizedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, NormalizedValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NormalizedValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NormalizedValue::IntegerString(s)
            | NormalizedValue::Text(s)
            | NormalizedValue::Timestamp(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for NormalizedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NormalizedValue::Null => serializer.serialize_unit(),
            NormalizedValue::Number(n) => {
                // Integral values print without a trailing ".0"; -0.0 keeps its sign
                let negative_zero = *n == 0.0 && n.is_sign_negative();
                if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER as f64 && !negative_zero {
                    serializer.serialize_i64(*n as i64)
                } else if n.is_finite() {
                    serializer.serialize_f64(*n)
                } else {
                    serializer.serialize_unit()
                }
            }
            NormalizedValue::IntegerString(s)
            | NormalizedValue::Text(s)
            | NormalizedValue::Timestamp(s) => serializer.serialize_str(s),
            NormalizedValue::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}
