/// Currency utility functions for handling dollar conversions
///
/// All monetary values in the database are stored in cents (1 dollar = 100
/// cents) to avoid floating-point precision issues.

/// Convert dollars to cents (multiply by 100)
pub fn dollars_to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Convert cents to dollars (divide by 100)
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Format cents as a dollar string with 2 decimal places
pub fn format_cents_as_dollars(cents: i64) -> String {
    format!("${:.2}", cents_to_dollars(cents))
}

/// Validate and parse an amount string to cents
pub fn parse_amount_to_cents(amount_str: &str) -> Result<i64, String> {
    amount_str
        .parse::<f64>()
        .map_err(|_| "Invalid amount format".to_string())
        .and_then(|amount| {
            if amount < 0.0 {
                Err("Amount cannot be negative".to_string())
            } else {
                Ok(dollars_to_cents(amount))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollars_to_cents() {
        assert_eq!(dollars_to_cents(100.0), 10000);
        assert_eq!(dollars_to_cents(0.50), 50);
        assert_eq!(dollars_to_cents(123.45), 12345);
    }

    #[test]
    fn test_cents_to_dollars() {
        assert_eq!(cents_to_dollars(10000), 100.0);
        assert_eq!(cents_to_dollars(50), 0.50);
        assert_eq!(cents_to_dollars(12345), 123.45);
    }

    #[test]
    fn test_format_cents_as_dollars() {
        assert_eq!(format_cents_as_dollars(10000), "$100.00");
        assert_eq!(format_cents_as_dollars(50), "$0.50");
        assert_eq!(format_cents_as_dollars(12345), "$123.45");
    }

    #[test]
    fn test_parse_amount_to_cents() {
        assert_eq!(parse_amount_to_cents("100.00"), Ok(10000));
        assert_eq!(parse_amount_to_cents("0.50"), Ok(50));
        assert_eq!(parse_amount_to_cents("-100"), Err("Amount cannot be negative".to_string()));
        assert_eq!(parse_amount_to_cents("abc"), Err("Invalid amount format".to_string()));
    }
}
