//! Conversion from Arrow arrays into [`CellValue`] columns
//!
//! The parquet reader hands back Arrow record batches. Each column is first
//! flattened to a canonical array type (dictionary, large and view layouts are
//! cast to their plain form), then walked cell by cell.

use crate::{CellValue, DecodeError, LogicalType, Result};
use arrow_array::{Array, ArrayRef};
use arrow_schema::{DataType, Field};
use ordered_float::OrderedFloat;
use std::sync::Arc;

/// Map an Arrow field onto the logical type the normalizer understands
pub fn logical_type_for(field: &Field) -> Result<LogicalType> {
    data_type_to_logical(field.name(), field.data_type())
}

fn data_type_to_logical(column: &str, data_type: &DataType) -> Result<LogicalType> {
    let logical = match data_type {
        DataType::Null => LogicalType::Null,
        DataType::Boolean => LogicalType::Boolean,
        DataType::Int8 => int(8, true),
        DataType::Int16 => int(16, true),
        DataType::Int32 => int(32, true),
        DataType::Int64 => int(64, true),
        DataType::UInt8 => int(8, false),
        DataType::UInt16 => int(16, false),
        DataType::UInt32 => int(32, false),
        DataType::UInt64 => int(64, false),
        DataType::Float16 => LogicalType::Float { bit_width: 16 },
        DataType::Float32 => LogicalType::Float { bit_width: 32 },
        DataType::Float64 => LogicalType::Float { bit_width: 64 },
        DataType::Decimal128(precision, scale) | DataType::Decimal256(precision, scale) => {
            LogicalType::Decimal {
                precision: *precision,
                scale: *scale,
            }
        }
        // Binary cells are validated as UTF-8 while decoding
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Utf8View
        | DataType::Binary
        | DataType::LargeBinary
        | DataType::BinaryView
        | DataType::FixedSizeBinary(_) => LogicalType::String,
        DataType::Timestamp(unit, timezone) => LogicalType::Timestamp {
            unit: unit.into(),
            timezone: timezone.as_ref().map(|tz| Arc::from(tz.as_ref())),
        },
        DataType::Date32 | DataType::Date64 => LogicalType::Date,
        DataType::Time32(unit) | DataType::Time64(unit) => LogicalType::Time { unit: unit.into() },
        DataType::Dictionary(_, value_type) => data_type_to_logical(column, value_type)?,
        other => return Err(DecodeError::unsupported_type(column, format!("{}", other))),
    };
    Ok(logical)
}

fn int(bit_width: u8, signed: bool) -> LogicalType {
    LogicalType::Int { bit_width, signed }
}

/// Cast layouts that share a logical type onto the single array type
/// [`append_cells`] knows how to walk
pub fn canonicalize(column: &str, array: ArrayRef) -> Result<ArrayRef> {
    let target = canonical_type(array.data_type());
    if &target == array.data_type() {
        return Ok(array);
    }

    arrow::compute::cast(array.as_ref(), &target).map_err(|e| {
        DecodeError::malformed(format!("failed to decode column '{}': {}", column, e))
    })
}

fn canonical_type(data_type: &DataType) -> DataType {
    match data_type {
        DataType::LargeUtf8 | DataType::Utf8View => DataType::Utf8,
        DataType::LargeBinary | DataType::BinaryView => DataType::Binary,
        DataType::Dictionary(_, value_type) => canonical_type(value_type),
        other => other.clone(),
    }
}

/// Append every cell of `array` to `cells`, in row order
pub fn append_cells(column: &str, array: &dyn Array, cells: &mut Vec<CellValue>) -> Result<()> {
    cells.reserve(array.len());
    for index in 0..array.len() {
        cells.push(arrow_to_cell(column, array, index)?);
    }
    Ok(())
}

/// Convert a single value from an Arrow array at the given index to a CellValue
pub fn arrow_to_cell(column: &str, array: &dyn Array, index: usize) -> Result<CellValue> {
    use arrow_array::*;

    if array.is_null(index) {
        return Ok(CellValue::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(CellValue::Null),
        DataType::Boolean => {
            let array = downcast_array::<BooleanArray>(array)?;
            Ok(CellValue::Boolean(array.value(index)))
        }
        DataType::Int8 => {
            let array = downcast_array::<Int8Array>(array)?;
            Ok(CellValue::Int8(array.value(index)))
        }
        DataType::Int16 => {
            let array = downcast_array::<Int16Array>(array)?;
            Ok(CellValue::Int16(array.value(index)))
        }
        DataType::Int32 => {
            let array = downcast_array::<Int32Array>(array)?;
            Ok(CellValue::Int32(array.value(index)))
        }
        DataType::Int64 => {
            let array = downcast_array::<Int64Array>(array)?;
            Ok(CellValue::Int64(array.value(index)))
        }
        DataType::UInt8 => {
            let array = downcast_array::<UInt8Array>(array)?;
            Ok(CellValue::UInt8(array.value(index)))
        }
        DataType::UInt16 => {
            let array = downcast_array::<UInt16Array>(array)?;
            Ok(CellValue::UInt16(array.value(index)))
        }
        DataType::UInt32 => {
            let array = downcast_array::<UInt32Array>(array)?;
            Ok(CellValue::UInt32(array.value(index)))
        }
        DataType::UInt64 => {
            let array = downcast_array::<UInt64Array>(array)?;
            Ok(CellValue::UInt64(array.value(index)))
        }
        DataType::Float16 => {
            let array = downcast_array::<Float16Array>(array)?;
            Ok(CellValue::Float32(OrderedFloat(array.value(index).to_f32())))
        }
        DataType::Float32 => {
            let array = downcast_array::<Float32Array>(array)?;
            Ok(CellValue::Float32(OrderedFloat(array.value(index))))
        }
        DataType::Float64 => {
            let array = downcast_array::<Float64Array>(array)?;
            Ok(CellValue::Float64(OrderedFloat(array.value(index))))
        }

        DataType::Utf8 => {
            let array = downcast_array::<StringArray>(array)?;
            Ok(CellValue::String(Arc::from(array.value(index))))
        }
        DataType::Binary => {
            let array = downcast_array::<BinaryArray>(array)?;
            binary_to_text(column, "Binary", array.value(index), index)
        }
        DataType::FixedSizeBinary(size) => {
            let array = downcast_array::<FixedSizeBinaryArray>(array)?;
            binary_to_text(
                column,
                &format!("FixedSizeBinary({})", size),
                array.value(index),
                index,
            )
        }

        DataType::Decimal128(_precision, scale) => {
            let array = downcast_array::<Decimal128Array>(array)?;
            Ok(CellValue::Decimal128(array.value(index), *scale))
        }
        DataType::Decimal256(_precision, scale) => {
            let array = downcast_array::<Decimal256Array>(array)?;
            let bytes = array.value(index).to_le_bytes();

            // Two's complement little-endian bytes to BigInt
            let bigint = if bytes[31] & 0x80 != 0 {
                let mut inverted = [0u8; 32];
                for (i, &b) in bytes.iter().enumerate() {
                    inverted[i] = !b;
                }
                let positive = num::BigInt::from_bytes_le(num::bigint::Sign::Plus, &inverted);
                -(positive + num::BigInt::from(1))
            } else {
                num::BigInt::from_bytes_le(num::bigint::Sign::Plus, &bytes)
            };

            Ok(CellValue::Decimal256(bigint, *scale))
        }

        DataType::Timestamp(unit, _) => match unit {
            arrow_schema::TimeUnit::Second => {
                let array = downcast_array::<TimestampSecondArray>(array)?;
                Ok(CellValue::TimestampSecond(array.value(index)))
            }
            arrow_schema::TimeUnit::Millisecond => {
                let array = downcast_array::<TimestampMillisecondArray>(array)?;
                Ok(CellValue::TimestampMillis(array.value(index)))
            }
            arrow_schema::TimeUnit::Microsecond => {
                let array = downcast_array::<TimestampMicrosecondArray>(array)?;
                Ok(CellValue::TimestampMicros(array.value(index)))
            }
            arrow_schema::TimeUnit::Nanosecond => {
                let array = downcast_array::<TimestampNanosecondArray>(array)?;
                Ok(CellValue::TimestampNanos(array.value(index)))
            }
        },

        DataType::Date32 => {
            let array = downcast_array::<Date32Array>(array)?;
            Ok(CellValue::Date32(array.value(index)))
        }
        DataType::Date64 => {
            let array = downcast_array::<Date64Array>(array)?;
            Ok(CellValue::Date64(array.value(index)))
        }

        DataType::Time32(unit) => match unit {
            arrow_schema::TimeUnit::Second => {
                let array = downcast_array::<Time32SecondArray>(array)?;
                Ok(CellValue::TimeSecond(array.value(index)))
            }
            arrow_schema::TimeUnit::Millisecond => {
                let array = downcast_array::<Time32MillisecondArray>(array)?;
                Ok(CellValue::TimeMillis(array.value(index)))
            }
            other => Err(DecodeError::unsupported_type(
                column,
                format!("Time32({:?})", other),
            )),
        },
        DataType::Time64(unit) => match unit {
            arrow_schema::TimeUnit::Microsecond => {
                let array = downcast_array::<Time64MicrosecondArray>(array)?;
                Ok(CellValue::TimeMicros(array.value(index)))
            }
            arrow_schema::TimeUnit::Nanosecond => {
                let array = downcast_array::<Time64NanosecondArray>(array)?;
                Ok(CellValue::TimeNanos(array.value(index)))
            }
            other => Err(DecodeError::unsupported_type(
                column,
                format!("Time64({:?})", other),
            )),
        },

        dt => Err(DecodeError::unsupported_type(column, format!("{}", dt))),
    }
}

fn binary_to_text(column: &str, data_type: &str, bytes: &[u8], index: usize) -> Result<CellValue> {
    match simdutf8::basic::from_utf8(bytes) {
        Ok(text) => Ok(CellValue::String(Arc::from(text))),
        Err(_) => Err(DecodeError::unsupported_type(
            column,
            format!("{} (row {} is not valid UTF-8)", data_type, index),
        )),
    }
}

/// Helper function to downcast an array with better error messages
fn downcast_array<T: 'static>(array: &dyn Array) -> Result<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        DecodeError::malformed(format!("Failed to cast to {}", std::any::type_name::<T>()))
    })
}
