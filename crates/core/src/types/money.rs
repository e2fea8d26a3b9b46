//! Display formatting for monetary amounts.
//!
//! All prices in the store are Bangladeshi Taka held as [`Decimal`] values.
//! Display is whole-unit with no decimal places, which is how every surface
//! of the shop renders money.

use rust_decimal::Decimal;

/// Format an amount as whole-unit BDT (e.g. `৳1500`).
///
/// Fractional amounts are rounded to the nearest taka before formatting.
///
/// # Examples
///
/// ```
/// use attar_core::format_bdt;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_bdt(Decimal::new(1500, 0)), "৳1500");
/// assert_eq!(format_bdt(Decimal::new(99950, 2)), "৳1000"); // 999.50 rounds up
/// ```
#[must_use]
pub fn format_bdt(amount: Decimal) -> String {
    format!("৳{}", amount.round_dp(0).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_units() {
        assert_eq!(format_bdt(Decimal::new(0, 0)), "৳0");
        assert_eq!(format_bdt(Decimal::new(4000, 0)), "৳4000");
    }

    #[test]
    fn test_fractions_round() {
        assert_eq!(format_bdt(Decimal::new(149949, 2)), "৳1499");
        assert_eq!(format_bdt(Decimal::new(149950, 2)), "৳1500");
    }

    #[test]
    fn test_trailing_zeros_dropped() {
        // 1500.00 must not render as "1500.00"
        assert_eq!(format_bdt(Decimal::new(150000, 2)), "৳1500");
    }
}
