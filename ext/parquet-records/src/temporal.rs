//! ISO-8601 rendering for timestamp, date and time-of-day cells

use crate::TimeUnit;
use jiff::civil::{Date, Time};
use jiff::tz::{Offset, TimeZone};
use jiff::{Span, Timestamp};

const NANOS_PER_DAY: i64 = 86_400 * 1_000_000_000;

/// Zone a timestamp column is rendered in
#[derive(Debug, Clone)]
pub struct ColumnZone {
    tz: TimeZone,
    utc: bool,
}

impl ColumnZone {
    pub fn utc() -> Self {
        Self {
            tz: TimeZone::UTC,
            utc: true,
        }
    }

    /// Resolve a declared timezone: IANA names, or `±HH:MM`, `±HHMM`, `±HH`
    pub fn parse(name: &str) -> Option<Self> {
        if matches!(name, "UTC" | "Z" | "Etc/UTC" | "utc") {
            return Some(Self::utc());
        }

        if name.starts_with('+') || name.starts_with('-') {
            let offset = parse_fixed_offset(name)?;
            if offset.seconds() == 0 {
                return Some(Self::utc());
            }
            return Some(Self {
                tz: TimeZone::fixed(offset),
                utc: false,
            });
        }

        TimeZone::get(name)
            .ok()
            .map(|tz| Self { tz, utc: false })
    }

    pub fn is_utc(&self) -> bool {
        self.utc
    }
}

fn parse_fixed_offset(text: &str) -> Option<Offset> {
    let negative = text.starts_with('-');
    let digits: String = text[1..].chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 18 || minutes > 59 {
        return None;
    }

    let seconds = hours * 3600 + minutes * 60;
    Offset::from_seconds(if negative { -seconds } else { seconds }).ok()
}

/// Epoch count in `unit` to a [`Timestamp`]; `None` when out of range
pub fn to_timestamp(value: i64, unit: TimeUnit) -> Option<Timestamp> {
    match unit {
        TimeUnit::Second => Timestamp::from_second(value),
        TimeUnit::Millisecond => Timestamp::from_millisecond(value),
        TimeUnit::Microsecond => Timestamp::from_microsecond(value),
        TimeUnit::Nanosecond => Timestamp::from_nanosecond(i128::from(value)),
    }
    .ok()
}

/// RFC 3339 date-time with as many fractional digits as `unit` resolves
pub fn format_timestamp(ts: Timestamp, zone: &ColumnZone, unit: TimeUnit) -> String {
    let zoned = ts.to_zoned(zone.tz.clone());
    let mut out = zoned.strftime("%Y-%m-%dT%H:%M:%S").to_string();
    push_fraction(&mut out, zoned.subsec_nanosecond(), unit);

    if zone.utc {
        out.push('Z');
    } else {
        push_offset(&mut out, zoned.offset());
    }
    out
}

fn push_fraction(out: &mut String, subsec_nanos: i32, unit: TimeUnit) {
    let digits = unit.fraction_digits();
    if digits > 0 {
        let nanos = format!("{:09}", subsec_nanos);
        out.push('.');
        out.push_str(&nanos[..digits]);
    }
}

fn push_offset(out: &mut String, offset: Offset) {
    let seconds = offset.seconds();
    let sign = if seconds < 0 { '-' } else { '+' };
    let seconds = seconds.abs();
    out.push_str(&format!("{}{:02}:{:02}", sign, seconds / 3600, (seconds % 3600) / 60));
}

/// Days since the epoch to `YYYY-MM-DD`
pub fn format_date32(days: i32) -> Option<String> {
    let span = Span::new().try_days(days).ok()?;
    let date = Date::constant(1970, 1, 1).checked_add(span).ok()?;
    Some(date.strftime("%Y-%m-%d").to_string())
}

/// Milliseconds since the epoch to the UTC calendar date
pub fn format_date64(millis: i64) -> Option<String> {
    let ts = Timestamp::from_millisecond(millis).ok()?;
    Some(ts.to_zoned(TimeZone::UTC).date().strftime("%Y-%m-%d").to_string())
}

/// Time since midnight in `unit` to `HH:MM:SS[.fff]`
pub fn format_time(value: i64, unit: TimeUnit) -> Option<String> {
    let factor = match unit {
        TimeUnit::Second => 1_000_000_000,
        TimeUnit::Millisecond => 1_000_000,
        TimeUnit::Microsecond => 1_000,
        TimeUnit::Nanosecond => 1,
    };
    let nanos = value.checked_mul(factor)?;
    if !(0..NANOS_PER_DAY).contains(&nanos) {
        return None;
    }

    let seconds = nanos / 1_000_000_000;
    let time = Time::new(
        (seconds / 3600) as i8,
        ((seconds % 3600) / 60) as i8,
        (seconds % 60) as i8,
        (nanos % 1_000_000_000) as i32,
    )
    .ok()?;

    let mut out = time.strftime("%H:%M:%S").to_string();
    push_fraction(&mut out, time.subsec_nanosecond(), unit);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_timestamp_units() {
        let utc = ColumnZone::utc();
        let ts = to_timestamp(1_704_067_200, TimeUnit::Second).unwrap();
        assert_eq!(
            format_timestamp(ts, &utc, TimeUnit::Second),
            "2024-01-01T00:00:00Z"
        );

        let ts = to_timestamp(1_704_067_200_123, TimeUnit::Millisecond).unwrap();
        assert_eq!(
            format_timestamp(ts, &utc, TimeUnit::Millisecond),
            "2024-01-01T00:00:00.123Z"
        );

        let ts = to_timestamp(1_704_067_200_000_001, TimeUnit::Microsecond).unwrap();
        assert_eq!(
            format_timestamp(ts, &utc, TimeUnit::Microsecond),
            "2024-01-01T00:00:00.000001Z"
        );

        let ts = to_timestamp(-1, TimeUnit::Nanosecond).unwrap();
        assert_eq!(
            format_timestamp(ts, &utc, TimeUnit::Nanosecond),
            "1969-12-31T23:59:59.999999999Z"
        );
    }

    #[test]
    fn test_fixed_offset_zone() {
        let zone = ColumnZone::parse("+09:00").unwrap();
        assert!(!zone.is_utc());
        let ts = to_timestamp(0, TimeUnit::Second).unwrap();
        assert_eq!(
            format_timestamp(ts, &zone, TimeUnit::Second),
            "1970-01-01T09:00:00+09:00"
        );

        let zone = ColumnZone::parse("-0530").unwrap();
        assert_eq!(
            format_timestamp(ts, &zone, TimeUnit::Millisecond),
            "1969-12-31T18:30:00.000-05:30"
        );

        assert!(ColumnZone::parse("+00:00").unwrap().is_utc());
        assert!(ColumnZone::parse("+25:00").is_none());
        assert!(ColumnZone::parse("+9x").is_none());
    }

    #[test]
    fn test_iana_zone() {
        let zone = ColumnZone::parse("America/New_York").unwrap();
        let ts = to_timestamp(1_704_067_200, TimeUnit::Second).unwrap();
        assert_eq!(
            format_timestamp(ts, &zone, TimeUnit::Second),
            "2023-12-31T19:00:00-05:00"
        );
        assert!(ColumnZone::parse("Not/AZone").is_none());
        assert!(ColumnZone::parse("UTC").unwrap().is_utc());
    }

    #[test]
    fn test_out_of_range_timestamp() {
        assert!(to_timestamp(i64::MAX, TimeUnit::Second).is_none());
        assert!(to_timestamp(i64::MAX, TimeUnit::Nanosecond).is_some());
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date32(0).unwrap(), "1970-01-01");
        assert_eq!(format_date32(19_723).unwrap(), "2024-01-01");
        assert_eq!(format_date32(-365).unwrap(), "1969-01-01");
        assert!(format_date32(i32::MAX).is_none());
        assert_eq!(format_date64(19_723 * 86_400_000).unwrap(), "2024-01-01");
    }

    #[test]
    fn test_times() {
        assert_eq!(format_time(0, TimeUnit::Second).unwrap(), "00:00:00");
        assert_eq!(
            format_time(45_296_789, TimeUnit::Millisecond).unwrap(),
            "12:34:56.789"
        );
        assert_eq!(
            format_time(86_399_999_999, TimeUnit::Microsecond).unwrap(),
            "23:59:59.999999"
        );
        assert!(format_time(86_400, TimeUnit::Second).is_none());
        assert!(format_time(-1, TimeUnit::Nanosecond).is_none());
    }
}
