/// Writes a float the way downstream tabular tooling expects it.
///
/// Shortest round-trip digits. Decimal exponents below -4 or at 16 and above
/// switch to scientific notation with a signed, two-digit exponent
/// (`1e-05`, `1.5e+16`). Integral values otherwise keep one decimal (`1.0`).
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    let scientific = format!("{:e}", value);
    if let Some((mantissa, exponent)) = scientific.split_once('e')
        && let Ok(exponent) = exponent.parse::<i32>()
        && !(-4..16).contains(&exponent)
    {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Like [`format_float`] but missing (or NaN) values become an empty cell.
pub fn format_optional_float(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format_float(v),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-3.0), "-3.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(0.0001), "0.0001");
        assert_eq!(format_float(123456.5), "123456.5");
        assert_eq!(format_float(1e15), "1000000000000000.0");
    }

    #[test]
    fn test_format_float_scientific() {
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(-2.5e-7), "-2.5e-07");
        assert_eq!(format_float(1e16), "1e+16");
        assert_eq!(format_float(1.5e16), "1.5e+16");
        assert_eq!(format_float(1.25e-123), "1.25e-123");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_optional_float(None), "");
        assert_eq!(format_optional_float(Some(f64::NAN)), "");
        assert_eq!(format_optional_float(Some(2.5)), "2.5");
    }
}
