//! Numeric helpers for rates and percentages

/// Round half away from zero to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `numerator / denominator * 100`, rounded to one decimal.
/// Returns 0 when the denominator is 0.
pub fn percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round_one_decimal((numerator as f64 / denominator as f64) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(33.333), 33.3);
        assert_eq!(round_one_decimal(66.666), 66.7);
        assert_eq!(round_one_decimal(12.25), 12.3);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 2), 50.0);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(5, 5), 100.0);
    }

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(10, 0), 0.0);
    }

    #[test]
    fn test_percentage_display_drops_trailing_zero() {
        assert_eq!(percentage(1, 2).to_string(), "50");
        assert_eq!(percentage(1, 8).to_string(), "12.5");
    }
}
