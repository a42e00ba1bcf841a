use std::fmt;
use std::sync::Arc;

/// Resolution of a timestamp or time-of-day column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// Number of fractional second digits rendered for this unit
    pub fn fraction_digits(&self) -> usize {
        match self {
            TimeUnit::Second => 0,
            TimeUnit::Millisecond => 3,
            TimeUnit::Microsecond => 6,
            TimeUnit::Nanosecond => 9,
        }
    }
}

impl From<&arrow_schema::TimeUnit> for TimeUnit {
    fn from(unit: &arrow_schema::TimeUnit) -> Self {
        match unit {
            arrow_schema::TimeUnit::Second => TimeUnit::Second,
            arrow_schema::TimeUnit::Millisecond => TimeUnit::Millisecond,
            arrow_schema::TimeUnit::Microsecond => TimeUnit::Microsecond,
            arrow_schema::TimeUnit::Nanosecond => TimeUnit::Nanosecond,
        }
    }
}

/// Declared logical type of a column, as read from the file schema
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Int { bit_width: u8, signed: bool },
    Float { bit_width: u8 },
    Decimal { precision: u8, scale: i8 },
    String,
    Boolean,
    Timestamp {
        unit: TimeUnit,
        timezone: Option<Arc<str>>,
    },
    Date,
    Time { unit: TimeUnit },
    /// Column with no physical values; every cell is null
    Null,
}

impl LogicalType {
    /// Get the logical type name for display
    pub fn type_name(&self) -> &'static str {
        match self {
            LogicalType::Int { .. } => "int",
            LogicalType::Float { .. } => "float",
            LogicalType::Decimal { .. } => "decimal",
            LogicalType::String => "string",
            LogicalType::Boolean => "boolean",
            LogicalType::Timestamp { .. } => "timestamp",
            LogicalType::Date => "date",
            LogicalType::Time { .. } => "time",
            LogicalType::Null => "null",
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            LogicalType::Timestamp { .. } | LogicalType::Date | LogicalType::Time { .. }
        )
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Int { bit_width, signed } => {
                write!(f, "{}int{}", if *signed { "" } else { "u" }, bit_width)
            }
            LogicalType::Float { bit_width } => write!(f, "float{}", bit_width),
            LogicalType::Decimal { precision, scale } => {
                write!(f, "decimal({}, {})", precision, scale)
            }
            LogicalType::Timestamp { unit, timezone } => match timezone {
                Some(tz) => write!(f, "timestamp({:?}, {})", unit, tz),
                None => write!(f, "timestamp({:?})", unit),
            },
            LogicalType::Time { unit } => write!(f, "time({:?})", unit),
            other => f.write_str(other.type_name()),
        }
    }
}
