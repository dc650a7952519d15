/// Format `value` with `digits` significant digits, `%g` style.
///
/// Fixed notation is used while the decimal exponent lies in
/// `-4..digits`, scientific notation (`1.2346e+05`) otherwise. Trailing zeros
/// and a dangling decimal point are removed in both forms.
#[must_use]
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Rounding to `digits` may bump the exponent (9.99999 -> 1.0000e1), so it
    // is read back from the rounded rendering.
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        );
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
