//! Number formatting for surface-facing strings (font sizes, alpha values).

/// Format `value` with `digits` significant digits, printf `%g` style.
///
/// Trailing zeroes are dropped, and values whose decimal exponent falls
/// outside `-4..digits` switch to exponent notation (`1.23e+03`).
pub fn format_significant(value: f32, digits: usize) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value.is_sign_positive() {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = digits.max(1);
    // Rust's exponent formatting rounds first, so the exponent is the one
    // of the rounded value.
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_trailing_zeroes(mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
        trim_trailing_zeroes(format!("{value:.decimals$}"))
    }
}

fn trim_trailing_zeroes(mut s: String) -> String {
    if let Some(dot) = s.find('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.len() == dot + 1 {
            s.pop();
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_digits_trims_zeroes() {
        assert_eq!(format_significant(0.5, 3), "0.5");
        assert_eq!(format_significant(1.0, 3), "1");
        assert_eq!(format_significant(26.666_666, 3), "26.7");
        assert_eq!(format_significant(0.333_333, 3), "0.333");
        assert_eq!(format_significant(100.0, 3), "100");
    }

    #[test]
    fn large_and_tiny_values_use_exponents() {
        assert_eq!(format_significant(1234.0, 3), "1.23e+03");
        assert_eq!(format_significant(0.000_012_5, 3), "1.25e-05");
    }

    #[test]
    fn zero_and_non_finite() {
        assert_eq!(format_significant(0.0, 3), "0");
        assert_eq!(format_significant(f32::NAN, 3), "nan");
    }
}
