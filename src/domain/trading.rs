//! Trade input validation and value math.

use super::error::PapertradeError;

/// Parse a share count submitted through a form.
///
/// Accepts only finite, positive, whole numbers. The value is kept as `f64`
/// because the transaction ledger stores signed fractional-capable
/// quantities, but anything non-integral is rejected here before it can
/// reach the store.
pub fn parse_share_quantity(raw: &str) -> Result<f64, PapertradeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PapertradeError::MissingField {
            field: "shares".into(),
        });
    }

    let quantity: f64 = raw.parse().map_err(|_| PapertradeError::InvalidQuantity {
        reason: "quantity must be a number".into(),
    })?;

    if !quantity.is_finite() {
        return Err(PapertradeError::InvalidQuantity {
            reason: "quantity must be a number".into(),
        });
    }
    if quantity <= 0.0 {
        return Err(PapertradeError::InvalidQuantity {
            reason: "quantity must be greater than zero".into(),
        });
    }
    if quantity.fract() != 0.0 {
        return Err(PapertradeError::InvalidQuantity {
            reason: "quantity must be a whole number".into(),
        });
    }

    Ok(quantity)
}

/// Total value of a trade: quote price times share count.
pub fn trade_value(price: f64, quantity: f64) -> f64 {
    price * quantity
}

/// Normalize a transaction's ticker for storage.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_whole_positive_quantities() {
        assert_eq!(parse_share_quantity("10").unwrap(), 10.0);
        assert_eq!(parse_share_quantity("1").unwrap(), 1.0);
        assert_eq!(parse_share_quantity(" 25 ").unwrap(), 25.0);
        assert_eq!(parse_share_quantity("10.0").unwrap(), 10.0);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            parse_share_quantity(""),
            Err(PapertradeError::MissingField { .. })
        ));
        assert!(matches!(
            parse_share_quantity("   "),
            Err(PapertradeError::MissingField { .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(matches!(
            parse_share_quantity("ten"),
            Err(PapertradeError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            parse_share_quantity("1x"),
            Err(PapertradeError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert!(parse_share_quantity("0").is_err());
        assert!(parse_share_quantity("-5").is_err());
        assert!(parse_share_quantity("-0.5").is_err());
    }

    #[test]
    fn rejects_fractional_shares() {
        assert!(matches!(
            parse_share_quantity("1.5"),
            Err(PapertradeError::InvalidQuantity { .. })
        ));
        assert!(parse_share_quantity("0.25").is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(parse_share_quantity("inf").is_err());
        assert!(parse_share_quantity("NaN").is_err());
    }

    #[test]
    fn trade_value_is_price_times_quantity() {
        assert_eq!(trade_value(20.0, 10.0), 200.0);
        assert_eq!(trade_value(25.0, 10.0), 250.0);
    }

    #[test]
    fn normalize_symbol_uppercases_and_trims() {
        assert_eq!(normalize_symbol(" aapl "), "AAPL");
        assert_eq!(normalize_symbol("Brk.B"), "BRK.B");
    }

    proptest! {
        #[test]
        fn whole_positive_integers_always_parse(n in 1u32..1_000_000) {
            let parsed = parse_share_quantity(&n.to_string()).unwrap();
            prop_assert_eq!(parsed, n as f64);
        }

        #[test]
        fn negative_integers_never_parse(n in 1i64..1_000_000) {
            let neg = format!("-{}", n);
            prop_assert!(parse_share_quantity(&neg).is_err());
        }
    }
}
