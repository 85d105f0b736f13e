//! Conversion of decimal-string fields into numbers.
//!
//! Fallback policy: an absent value is zero. A present value that does not
//! parse as a finite decimal is also zero, and is reported with a `warn!`
//! naming the field so bad fixture data shows up in the logs.

use tracing::warn;

/// Parse a decimal-string field, treating absent or unparseable input as zero.
#[must_use]
pub fn parse_decimal_or_zero(field: &str, raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            warn!(field, value = %raw, "Unparseable decimal; counting as zero");
            0.0
        }
    }
}

/// Parse a decimal-string field into fixed-point hundredths.
///
/// Sums of hundredths are exact, so folding them is independent of order.
#[must_use]
pub fn parse_hundredths_or_zero(field: &str, raw: Option<&str>) -> i64 {
    to_hundredths(parse_decimal_or_zero(field, raw))
}

/// Round a value to the nearest hundredth, in fixed point.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_hundredths(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// Render fixed-point hundredths with one decimal place.
///
/// Ties round away from zero, so `0.25` renders as `0.3`.
#[must_use]
pub fn format_one_decimal(hundredths: i64) -> String {
    let tenths = if hundredths >= 0 {
        hundredths.saturating_add(5) / 10
    } else {
        hundredths.saturating_sub(5) / 10
    };
    let sign = if tenths < 0 { "-" } else { "" };
    let magnitude = tenths.unsigned_abs();
    format!("{sign}{}.{}", magnitude / 10, magnitude % 10)
}
