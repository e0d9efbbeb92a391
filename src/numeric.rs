//! String-typed arithmetic.
//!
//! Instrument settings are stored as the exact strings the hardware prints, so every
//! derived value is computed from strings and rendered back through [`format_float`].
//! All helpers are pure and deterministic for identical inputs.

use crate::error::NumericError;

/// Significant digits kept when rendering a value, as the instrument prints them.
const SIGNIFICANT_DIGITS: usize = 6;

/// Scale applied to numerator and denominator before dividing.
const DIVIDE_SCALE: f64 = 1e10;

/// Parse a numeric setting string. `NAN` and `INF` spellings are refused.
pub fn parse_number(value: &str) -> Result<f64, NumericError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| NumericError::NotANumber(value.to_string()))
}

/// Render a value in general format with six significant digits: trailing zeros
/// removed, exponent form for very small or large magnitudes (`1e-06`,
/// `1.23457e+06`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // Round to the target precision first; the exponent of the rounded value
    // decides between fixed and exponent layout.
    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// `a - b`.
pub fn subtract(a: &str, b: &str) -> Result<String, NumericError> {
    Ok(format_float(parse_number(a)? - parse_number(b)?))
}

/// `a * b`.
pub fn multiply(a: &str, b: &str) -> Result<String, NumericError> {
    Ok(format_float(parse_number(a)? * parse_number(b)?))
}

/// `n / d`, or the literal `"inf"` when `d` is zero.
pub fn divide(n: &str, d: &str) -> Result<String, NumericError> {
    let numerator = parse_number(n)?;
    let denominator = parse_number(d)?;
    if denominator == 0.0 {
        return Ok("inf".to_string());
    }
    Ok(format_float(
        (numerator * DIVIDE_SCALE) / (denominator * DIVIDE_SCALE),
    ))
}

/// Map a channel token such as `C2` to its zero-based index.
///
/// Only the digit following the leading letter is considered, so `C2` and `C29`
/// both map to index 1.
pub fn channel_to_index(channel: &str) -> Option<usize> {
    let number = channel.chars().nth(1)?.to_digit(10)? as usize;
    number.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_values_have_no_fraction() {
        assert_eq!(format_float(4.0), "4");
        assert_eq!(format_float(-2.0), "-2");
        assert_eq!(format_float(1000.0), "1000");
        assert_eq!(format_float(-0.0), "0");
    }

    #[test]
    fn fractional_values_are_minimal() {
        assert_eq!(format_float(120.1), "120.1");
        assert_eq!(format_float(0.707), "0.707");
        assert_eq!(format_float(20.0 * 0.3535), "7.07");
        assert_eq!(format_float(1.0 / 3.0), "0.333333");
        assert_eq!(format_float(19.99738), "19.9974");
    }

    #[test]
    fn extreme_magnitudes_use_exponent_form() {
        assert_eq!(format_float(1e-6), "1e-06");
        assert_eq!(format_float(1e15), "1e+15");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(0.00001234), "1.234e-05");
        assert_eq!(format_float(1234567.5), "1.23457e+06");
        assert_eq!(format_float(2_000_000.0), "2e+06");
        assert_eq!(format_float(999_999.5), "1e+06");
        assert_eq!(format_float(999_999.0), "999999");
    }

    #[test]
    fn divide_by_zero_is_inf() {
        assert_eq!(divide("1", "0").unwrap(), "inf");
        assert_eq!(divide("-3.5", "0.0").unwrap(), "inf");
    }

    #[test]
    fn divide_uses_scaled_operands() {
        assert_eq!(divide("17.89", "2").unwrap(), "8.945");
        assert_eq!(divide("1", "120.1").unwrap(), "0.00832639");
        assert_eq!(divide("1", "1000").unwrap(), "0.001");
    }

    #[test]
    fn arithmetic_on_strings() {
        assert_eq!(subtract("8.945", "17.89").unwrap(), "-8.945");
        assert_eq!(multiply("17.89", "0.3535").unwrap(), "6.32411");
        assert_eq!(multiply("9.99869", "2").unwrap(), "19.9974");
    }

    #[test]
    fn unparsable_input_is_an_error() {
        assert_eq!(
            multiply("abc", "2"),
            Err(NumericError::NotANumber("abc".to_string()))
        );
        assert!(divide("1", "").is_err());
    }

    #[test]
    fn non_finite_input_is_an_error() {
        for value in ["NAN", "nan", "INF", "-INF", "INFINITY"] {
            assert_eq!(
                parse_number(value),
                Err(NumericError::NotANumber(value.to_string()))
            );
        }
        assert!(multiply("INF", "2").is_err());
        assert_eq!(divide("1", "0").unwrap(), "inf");
    }

    #[test]
    fn channel_tokens_map_to_indices() {
        assert_eq!(channel_to_index("C1"), Some(0));
        assert_eq!(channel_to_index("C2"), Some(1));
        assert_eq!(channel_to_index("C0"), None);
        assert_eq!(channel_to_index("foo"), None);
        assert_eq!(channel_to_index("C"), None);
    }
}
