//! Field-level wire codec: fixed-width text, implied-point numerics,
//! letter-flag booleans, dates with two-digit-year rollover.
//!
//! Encoding errors are raised before any I/O; decoding errors are
//! response-format (I/O class) because they mean the device reply could not
//! be understood.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{FiscalError, Result};

/// Sentinel emitted for an absent optional field, regardless of field kind.
pub const ABSENT: &str = "x";

/// Sentinel for a "not applicable" tax rate.
pub const TAX_NOT_APPLICABLE: &str = "**.**";

/// Left-justify, truncating or space-padding to `max_len`. Truncation is
/// silent and positional.
pub fn encode_text(text: &str, max_len: usize) -> String {
    let truncated: String = text.chars().take(max_len).collect();
    format!("{truncated:<max_len$}")
}

/// Mirror of [`encode_text`]: strips the trailing padding.
pub fn decode_text(wire: &str) -> String {
    wire.trim_end().to_string()
}

/// Fixed-shape numeric field: zero-padded to `int_digits + frac_digits`
/// digits, decimal point implied. The fractional part is rounded half-up to
/// `frac_digits`; a negative value or integer-part overflow is an encoding
/// error, never a clamp.
pub fn encode_number(value: Decimal, int_digits: u32, frac_digits: u32) -> Result<String> {
    if value.is_sign_negative() {
        return Err(FiscalError::encoding(format!(
            "negative value {value} not representable; sign travels as a separate flag field"
        )));
    }

    let rounded = value.round_dp_with_strategy(frac_digits, RoundingStrategy::MidpointAwayFromZero);

    let limit = Decimal::from(10u64.pow(int_digits));
    if rounded >= limit {
        return Err(FiscalError::encoding(format!(
            "value {value} exceeds {int_digits} integer digit(s)"
        )));
    }

    let scale = Decimal::from(10u64.pow(frac_digits));
    let units = (rounded * scale)
        .to_u64()
        .ok_or_else(|| FiscalError::encoding(format!("value {value} out of range")))?;

    let width = (int_digits + frac_digits) as usize;
    Ok(format!("{units:0width$}"))
}

/// Mirror of [`encode_number`].
pub fn decode_number(wire: &str, int_digits: u32, frac_digits: u32) -> Result<Decimal> {
    let width = (int_digits + frac_digits) as usize;
    let digits = wire.trim();
    if digits.is_empty() || digits.len() > width || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FiscalError::format(format!("invalid numeric field {wire:?}")));
    }

    let units: i64 = digits
        .parse()
        .map_err(|_| FiscalError::format(format!("numeric field {wire:?} out of range")))?;

    Ok(Decimal::new(units, frac_digits))
}

/// Currency amount: half-up rounding to exactly 2 decimals, then the
/// numeric rule with shape (9,2). Must match the device's accounting
/// semantics to the cent.
pub fn encode_amount(value: Decimal) -> Result<String> {
    encode_number(value, 9, 2)
}

/// Mirror of [`encode_amount`].
pub fn decode_amount(wire: &str) -> Result<Decimal> {
    decode_number(wire, 9, 2)
}

/// Unbounded-precision quantity: plain decimal text, normalized (no
/// trailing zeros, no exponent).
pub fn encode_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Mirror of [`encode_quantity`].
pub fn decode_quantity(wire: &str) -> Result<Decimal> {
    wire.trim()
        .parse()
        .map_err(|_| FiscalError::format(format!("invalid quantity field {wire:?}")))
}

/// Letter-flag boolean. The letter pair is part of each operation's schema,
/// not a global convention.
pub fn encode_boolean(value: bool, true_char: char, false_char: char) -> String {
    if value {
        true_char.to_string()
    } else {
        false_char.to_string()
    }
}

/// Mirror of [`encode_boolean`].
pub fn decode_boolean(wire: &str, true_char: char, false_char: char) -> Result<bool> {
    let mut chars = wire.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c == true_char => Ok(true),
        (Some(c), None) if c == false_char => Ok(false),
        _ => Err(FiscalError::format(format!(
            "invalid boolean field {wire:?}, expected {true_char:?} or {false_char:?}"
        ))),
    }
}

/// Date as `DDMMYY`.
pub fn encode_date(date: NaiveDate) -> String {
    format!("{:02}{:02}{:02}", date.day(), date.month(), date.year().rem_euclid(100))
}

/// Mirror of [`encode_date`]. Two-digit years below `rollover_year % 100`
/// map to the century after the rollover year.
pub fn decode_date(wire: &str, rollover_year: i32) -> Result<NaiveDate> {
    let s = wire.trim();
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FiscalError::format(format!("invalid date field {wire:?}")));
    }

    let day: u32 = s[0..2].parse().map_err(|_| FiscalError::format(format!("invalid date field {wire:?}")))?;
    let month: u32 = s[2..4].parse().map_err(|_| FiscalError::format(format!("invalid date field {wire:?}")))?;
    let yy: i32 = s[4..6].parse().map_err(|_| FiscalError::format(format!("invalid date field {wire:?}")))?;

    let pivot = rollover_year.rem_euclid(100);
    let century = rollover_year - pivot;
    let year = if yy < pivot { century + 100 + yy } else { century + yy };

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| FiscalError::format(format!("invalid calendar date {wire:?}")))
}

/// Time as `HHMMSS`.
pub fn encode_time(time: NaiveTime) -> String {
    format!("{:02}{:02}{:02}", time.hour(), time.minute(), time.second())
}

/// Mirror of [`encode_time`].
pub fn decode_time(wire: &str) -> Result<NaiveTime> {
    let s = wire.trim();
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FiscalError::format(format!("invalid time field {wire:?}")));
    }

    let hour: u32 = s[0..2].parse().map_err(|_| FiscalError::format(format!("invalid time field {wire:?}")))?;
    let minute: u32 = s[2..4].parse().map_err(|_| FiscalError::format(format!("invalid time field {wire:?}")))?;
    let second: u32 = s[4..6].parse().map_err(|_| FiscalError::format(format!("invalid time field {wire:?}")))?;

    NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| FiscalError::format(format!("invalid time of day {wire:?}")))
}

/// Plain unsigned integer, no padding.
pub fn encode_long(value: u64) -> String {
    value.to_string()
}

/// Mirror of [`encode_long`].
pub fn decode_long(wire: &str) -> Result<u64> {
    wire.trim()
        .parse()
        .map_err(|_| FiscalError::format(format!("invalid integer field {wire:?}")))
}
