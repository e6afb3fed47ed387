//! Primitive value coercers.
//!
//! Each coercer turns one raw string into one primitive kind and rejects
//! values that do not fit the declared width instead of truncating them.

use std::str::FromStr;
use std::time::Duration;

use crate::error::ValueError;

/// Parse a base-10 integer at the width of `T`.
pub fn integer<T>(raw: &str) -> Result<T, ValueError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    Ok(raw.parse::<T>()?)
}

/// Parse a 64-bit float, rejecting literals whose magnitude overflows `f64`.
pub fn float64(raw: &str) -> Result<f64, ValueError> {
    let value = raw.parse::<f64>()?;
    check_float_range(raw, value.is_infinite(), 64)?;
    Ok(value)
}

/// Parse a 32-bit float, rejecting literals whose magnitude overflows `f32`.
pub fn float32(raw: &str) -> Result<f32, ValueError> {
    let narrow = raw.parse::<f64>()? as f32;
    check_float_range(raw, narrow.is_infinite(), 32)?;
    Ok(narrow)
}

/// Infinity is only accepted when spelled out.
fn check_float_range(raw: &str, infinite: bool, bits: u32) -> Result<(), ValueError> {
    let unsigned = raw.trim_start_matches(['+', '-']);
    let explicit = unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity");
    if infinite && !explicit {
        return Err(ValueError::FloatRange {
            value: raw.to_string(),
            bits,
        });
    }
    Ok(())
}

/// Parse a boolean literal.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn boolean(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ValueError::Bool {
            value: raw.to_string(),
        }),
    }
}

const NANOS_PER_UNIT: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
];

/// Parse a duration literal: a sequence of decimal numbers, each with an
/// optional fraction and a unit suffix, such as `300ms`, `1.5h` or `2h45m`.
///
/// Valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0`
/// is accepted. Negative durations are rejected.
pub fn duration(raw: &str) -> Result<Duration, ValueError> {
    let fail = |reason| ValueError::Duration {
        value: raw.to_string(),
        reason,
    };

    let mut rest = raw.strip_prefix('+').unwrap_or(raw);
    if rest.starts_with('-') {
        return Err(fail("negative durations are not supported"));
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(fail("empty duration"));
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after) = rest.split_at(int_len);
        let (frac_part, after) = match after.strip_prefix('.') {
            Some(after) => {
                let len = after.find(|c: char| !c.is_ascii_digit()).unwrap_or(after.len());
                after.split_at(len)
            }
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(fail("expected a number"));
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_len);
        if unit.is_empty() {
            return Err(fail("missing unit"));
        }
        let scale = NANOS_PER_UNIT
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| fail("unknown unit"))?;

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| fail("overflow"))?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(|| fail("overflow"))?;
        if !frac_part.is_empty() {
            // Digits beyond nanosecond precision cannot change the result.
            let digits = &frac_part[..frac_part.len().min(20)];
            let frac: u128 = digits.parse().map_err(|_| fail("overflow"))?;
            let denominator = 10u128.pow(digits.len() as u32);
            nanos = nanos
                .checked_add(frac * scale / denominator)
                .ok_or_else(|| fail("overflow"))?;
        }
        total = total.checked_add(nanos).ok_or_else(|| fail("overflow"))?;
        rest = after;
    }

    let secs = u64::try_from(total / 1_000_000_000).map_err(|_| fail("overflow"))?;
    Ok(Duration::new(secs, (total % 1_000_000_000) as u32))
}
