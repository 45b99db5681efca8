//! Timestamp coercion.
//!
//! Upstream sources disagree on the unit of numeric epochs, so numbers are
//! probed at seconds, milliseconds, microseconds and nanoseconds in that
//! order and the first plausible calendar date wins. Everything about this
//! heuristic lives here behind [`coerce_timestamp`].

use crate::core::errors::DecodeError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Timelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Powers of ten probed for numeric epochs: s, ms, us, ns
const EPOCH_SCALES: [u32; 4] = [0, 3, 6, 9];

const MIN_PLAUSIBLE_YEAR: i32 = 1;
const MAX_PLAUSIBLE_YEAR: i32 = 9999;

const FRACTION_DIGITS: usize = 6;

pub fn coerce_timestamp(value: &Value, field: &str) -> Result<DateTime<Utc>, DecodeError> {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()).and_then(from_epoch),
        Value::String(s) if is_numeric(s) => parse_decimal(s).and_then(from_epoch),
        Value::String(s) => parse_iso(s),
        _ => None,
    };
    parsed.ok_or_else(|| DecodeError::mismatch(field, "timestamp", value))
}

/// Canonical text form handed to serde
pub fn to_canonical(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Interpret an epoch of unknown unit
pub fn from_epoch(epoch: Decimal) -> Option<DateTime<Utc>> {
    EPOCH_SCALES.iter().find_map(|&exponent| {
        let seconds = epoch / Decimal::from(10_i64.pow(exponent));
        let whole = seconds.floor();
        let nanos = ((seconds - whole) * Decimal::from(1_000_000_000)).trunc();
        let timestamp = DateTime::from_timestamp(whole.to_i64()?, nanos.to_u32()?)?;
        is_plausible(&timestamp).then_some(timestamp)
    })
}

fn is_plausible(timestamp: &DateTime<Utc>) -> bool {
    use chrono::Datelike;
    (MIN_PLAUSIBLE_YEAR..=MAX_PLAUSIBLE_YEAR).contains(&timestamp.year())
}

fn is_numeric(s: &str) -> bool {
    let digits = s.bytes().filter(u8::is_ascii_digit).count();
    let dots = s.bytes().filter(|b| *b == b'.').count();
    digits > 0 && dots <= 1 && digits + dots == s.len()
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// `YYYY-MM-DDTHH:MM:SS[.fraction]` with an optional trailing zone marker, read as UTC
fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s
        .strip_suffix("+00:00")
        .unwrap_or(s)
        .trim_end_matches('Z');

    let (base, fraction) = match trimmed.split_once('.') {
        Some((base, fraction)) => (base, fraction),
        // Some payloads run the seconds into trailing digits, e.g. `...14:32:5100`
        None => {
            let run_on = trimmed.get(19..)?;
            if !run_on.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (trimmed.get(..19)?, "")
        }
    };
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut micros: String = fraction.chars().take(FRACTION_DIGITS).collect();
    while micros.len() < FRACTION_DIGITS {
        micros.push('0');
    }
    let micros: u32 = micros.parse().ok()?;

    let naive = NaiveDateTime::parse_from_str(base, "%Y-%m-%dT%H:%M:%S").ok()?;
    Some(naive.with_nanosecond(micros * 1_000)?.and_utc())
}
