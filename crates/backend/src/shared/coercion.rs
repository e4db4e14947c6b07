//! Tolerant conversion of untyped cells. Nothing here fails: a value that does not
//! parse is `None`, and callers decide whether that means zero or exclusion.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use contracts::shared::CellValue;

/// Largest Excel serial day number (9999-12-31)
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Earliest year accepted from a four-digit `%Y` field; chrono reads "24" as year 24
const MIN_YEAR: i32 = 1000;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-01-15
    "%m/%d/%Y", // 01/15/2024
    "%d/%m/%Y", // 15/01/2024
    "%Y/%m/%d", // 2024/01/15
    "%d-%m-%Y", // 15-01-2024
    "%d.%m.%Y", // 15.01.2024
    "%d-%b-%Y", // 15-Jan-2024
    "%b %d, %Y", // Jan 15, 2024
    "%Y%m%d",   // 20240115
];

/// Two-digit years, tried once the four-digit layouts failed
const SHORT_YEAR_FORMATS: &[&str] = &[
    "%m/%d/%y", // 01/15/24
    "%d/%m/%y", // 15/01/24
    "%d.%m.%y", // 15.01.24
    "%d-%b-%y", // 15-Jan-24
    "%m/%d/%y %H:%M:%S",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M:%S %p",
    "%m/%d/%y %I:%M %p",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M:%S %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p", // 05/01/2024 3:04:05 PM
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %I:%M %p",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Numeric value of a cell, `None` when it is empty or not a number
pub fn to_number(value: &CellValue) -> Option<f64> {
    let n = match value {
        CellValue::Number(n) => *n,
        CellValue::Integer(i) => *i as f64,
        CellValue::Text(s) => parse_number(s)?,
        CellValue::DateTime(_) | CellValue::Null => return None,
    };
    n.is_finite().then_some(n)
}

/// Numeric value of a cell, zero when it does not coerce
pub fn number_or_zero(value: Option<&CellValue>) -> f64 {
    value.and_then(to_number).unwrap_or(0.0)
}

/// Arithmetic on huge inputs can overflow; an infinite figure counts as zero
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Parse a number string, handling currency symbols and locale separators.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    // Accounting format: (12.50) is negative
    let is_negative = cleaned.starts_with('(') && cleaned.ends_with(')');
    let cleaned = if is_negative {
        &cleaned[1..cleaned.len() - 1]
    } else {
        cleaned
    };

    let cleaned: String = cleaned
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | '₹' | ' ' | '\u{a0}' | '\u{202f}'))
        .collect();

    // One comma followed by at most two digits is a decimal separator, otherwise
    // commas separate thousands
    let cleaned = match cleaned.find(',') {
        Some(pos) if cleaned.matches(',').count() == 1 && !cleaned.contains('.') => {
            if cleaned.len() - pos - 1 <= 2 {
                cleaned.replace(',', ".")
            } else {
                cleaned.replace(',', "")
            }
        }
        _ => cleaned.replace(',', ""),
    };

    match cleaned.parse::<f64>() {
        Ok(num) => Some(if is_negative { -num } else { num }),
        Err(_) => None,
    }
}

/// Calendar day of a cell, `None` when it cannot be placed on a time axis
pub fn to_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => parse_date(s),
        CellValue::Number(n) => excel_serial_to_date(*n),
        CellValue::Integer(i) => excel_serial_to_date(*i as f64),
        CellValue::Null => None,
    }
}

/// Try known date and datetime layouts; month-first wins over day-first.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.date_naive());
    }

    let cleaned = strip_utc_suffix(cleaned);

    let four_digit = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
                .map(|dt| dt.date())
        })
        .filter(|date| date.year() >= MIN_YEAR);
    if four_digit.is_some() {
        return four_digit;
    }

    SHORT_YEAR_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(cleaned, fmt)
            .ok()
            .or_else(|| NaiveDateTime::parse_from_str(cleaned, fmt).ok().map(|dt| dt.date()))
    })
}

/// Drop a trailing `Z`, `UTC` or `GMT`: every layout is read as wall-clock time
fn strip_utc_suffix(raw: &str) -> &str {
    let raw = raw.trim_end_matches('Z');
    ["UTC", "GMT"]
        .iter()
        .find_map(|tz| raw.strip_suffix(tz))
        .unwrap_or(raw)
        .trim_end()
}

/// Excel serial day number (1900 date system, 1899-12-30 epoch)
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}
