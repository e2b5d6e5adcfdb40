/// magnitude below which field values are written as exactly zero
pub(crate) const ZERO_THRESHOLD: f64 = 1e-16;

/// flush values that are numerically zero
pub(crate) fn flush_to_zero(value: f64) -> f64 {
    if value.abs() < ZERO_THRESHOLD {
        0.0
    } else {
        value
    }
}

/// significant digits of [`format_general`]
const GENERAL_PRECISION: i32 = 6;

/// Format a float like C's `%g`: 6 significant digits, trailing zeros removed, and
/// exponent notation when the decimal exponent is below -4 or at least 6.
/// `0.30000000000000004 -> "0.3"`, `1e6 -> "1e+06"`, `1e-7 -> "1e-07"`
pub(crate) fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // the exponent after rounding to the requested number of digits
    let scientific = format!("{:.*e}", (GENERAL_PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= GENERAL_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.abs()
        )
    } else {
        let decimals = (GENERAL_PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_trailing_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
