//! Fixed-point helpers
//!
//! On-chain quantities are integers scaled by `10^decimals` (E6 prices,
//! E9 capital). Conversion to and from decimal text works on digit strings
//! so no value ever passes through a float.

use crate::error::{PercolatorSdkError, Result};

/// Format an unsigned raw value with `decimals` implied decimal places.
pub fn format_unsigned(raw: u64, decimals: u32) -> String {
    format_magnitude(false, raw, decimals, decimals)
}

/// Format a signed raw value with `decimals` implied decimal places.
pub fn format_signed(raw: i64, decimals: u32) -> String {
    format_magnitude(raw < 0, raw.unsigned_abs(), decimals, decimals)
}

/// Like [`format_signed`] but keeps only `places` fractional digits.
/// Extra digits are truncated toward zero, never rounded.
pub fn format_signed_truncated(raw: i64, decimals: u32, places: u32) -> String {
    format_magnitude(raw < 0, raw.unsigned_abs(), decimals, places.min(decimals))
}

/// Parse decimal text into an unsigned raw value scaled by `10^decimals`.
pub fn parse_unsigned(text: &str, decimals: u32) -> Result<u64> {
    let (negative, magnitude) = parse_magnitude(text, decimals)?;
    if negative && magnitude != 0 {
        return Err(out_of_range(text, "u64"));
    }
    u64::try_from(magnitude).map_err(|_| out_of_range(text, "u64"))
}

/// Parse decimal text into a signed raw value scaled by `10^decimals`.
pub fn parse_signed(text: &str, decimals: u32) -> Result<i64> {
    let (negative, magnitude) = parse_magnitude(text, decimals)?;
    i128::try_from(magnitude)
        .ok()
        .map(|m| if negative { -m } else { m })
        .and_then(|v| i64::try_from(v).ok())
        .ok_or_else(|| out_of_range(text, "i64"))
}

fn format_magnitude(negative: bool, magnitude: u64, decimals: u32, places: u32) -> String {
    let sign = if negative { "-" } else { "" };
    let decimals = decimals as usize;
    if decimals == 0 {
        return format!("{sign}{magnitude}");
    }

    let digits = format!("{:0>width$}", magnitude, width = decimals + 1);
    let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
    match places as usize {
        0 => format!("{sign}{int_part}"),
        p => format!("{sign}{int_part}.{}", &frac_part[..p]),
    }
}

fn parse_magnitude(text: &str, decimals: u32) -> Result<(bool, u128)> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(PercolatorSdkError::InvalidDecimal(text.to_string()));
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(PercolatorSdkError::InvalidDecimal(text.to_string()));
    }
    if frac_part.len() > decimals as usize {
        return Err(PercolatorSdkError::InvalidDecimal(format!(
            "{text} has more than {decimals} fractional digits"
        )));
    }

    let padding = decimals as usize - frac_part.len();
    let digits = int_part
        .bytes()
        .chain(frac_part.bytes())
        .chain(std::iter::repeat(b'0').take(padding));

    let mut magnitude: u128 = 0;
    for digit in digits {
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(u128::from(digit - b'0')))
            .ok_or_else(|| out_of_range(text, "u128"))?;
    }
    Ok((negative, magnitude))
}

fn out_of_range(text: &str, target: &'static str) -> PercolatorSdkError {
    PercolatorSdkError::ValueOutOfRange {
        value: text.trim().to_string(),
        target,
    }
}
