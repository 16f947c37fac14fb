//! USD display formatting.

/// Format a dollar amount as `$1,234.56`, rounding to the nearest cent.
/// Negative amounts come out as `-$1,234.56`.
pub fn usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let fraction = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{fraction:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_dollars() {
        assert_eq!(usd(10_000.0), "$10,000.00");
        assert_eq!(usd(0.0), "$0.00");
        assert_eq!(usd(7.0), "$7.00");
    }

    #[test]
    fn formats_cents() {
        assert_eq!(usd(0.5), "$0.50");
        assert_eq!(usd(9_800.0), "$9,800.00");
        assert_eq!(usd(123.456), "$123.46");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(usd(999.99), "$999.99");
        assert_eq!(usd(1_000.0), "$1,000.00");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(usd(-3.5), "-$3.50");
        assert_eq!(usd(-10_050.0), "-$10,050.00");
    }

    #[test]
    fn rounds_to_nearest_cent() {
        // 0.125 is exactly representable, so the half-cent rounds away
        // from zero.
        assert_eq!(usd(0.125), "$0.13");
        assert_eq!(usd(19.994), "$19.99");
        assert_eq!(usd(19.996), "$20.00");
    }
}
