//! Forgiving numeric input and two-decimal display formatting.

use std::sync::LazyLock;

use regex::Regex;

// Leading decimal number, optionally signed, optionally with an exponent.
static NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("valid number regex")
});

/// Parses user input the way an editor field does: the leading numeric part
/// counts, anything unparseable (or non-finite) becomes `0.0`.
///
/// `"12.5"` -> 12.5, `" 3kg"` -> 3.0, `"abc"` -> 0.0, `""` -> 0.0.
pub fn parse_number(input: &str) -> f64 {
    let trimmed = input.trim();
    let value = NUMBER_PREFIX
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);

    finite_or_zero(value)
}

/// `value` unchanged when finite, `0.0` for NaN and infinities.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Rounds half away from zero to two decimals and formats with exactly two
/// fraction digits. A value that rounds to zero prints as `0.00`, never
/// `-0.00`.
pub fn format_fixed2(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.2}", rounded)
}

/// `symbol` followed by the two-decimal amount, e.g. `$250.00`.
pub fn format_money(symbol: &str, value: f64) -> String {
    format!("{}{}", symbol, format_fixed2(value))
}

/// Plain number display for quantities and percentages (`2`, `1.5`, `8.875`).
pub fn format_plain(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}
