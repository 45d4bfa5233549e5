//! Money formatting for receipts
//!
//! Amounts are rounded to cents (half away from zero) before formatting.

use rust_decimal::{Decimal, RoundingStrategy};

fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Plain two-decimal amount, period decimal separator, no grouping
///
/// # Examples
///
/// ```
/// use kermes_receipt::price::format_plain;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_plain(Decimal::new(125, 1)), "12.50");
/// assert_eq!(format_plain(Decimal::new(123456, 2)), "1234.56");
/// ```
pub fn format_plain(amount: Decimal) -> String {
    format!("{:.2}", to_cents(amount))
}

/// Two-decimal amount with `,` thousands grouping and `.` decimals
pub fn format_grouped(amount: Decimal) -> String {
    let plain = format_plain(amount.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(plain.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }

    let sign = if to_cents(amount).is_sign_negative() && !to_cents(amount).is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Exchange every `,` with `.` and every `.` with `,`
pub fn swap_separators(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            ',' => '.',
            '.' => ',',
            other => other,
        })
        .collect()
}

/// European amount: `.` thousands grouping, `,` decimals
///
/// # Examples
///
/// ```
/// use kermes_receipt::price::format_european;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_european(Decimal::new(12345, 1)), "1.234,50");
/// assert_eq!(format_european(Decimal::ZERO), "0,00");
/// ```
pub fn format_european(amount: Decimal) -> String {
    swap_separators(&format_grouped(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(format_plain(d("12.5")), "12.50");
        assert_eq!(format_plain(d("100")), "100.00");
        assert_eq!(format_plain(d("0.01")), "0.01");
        assert_eq!(format_plain(d("1234.5")), "1234.50");
    }

    #[test]
    fn test_format_plain_rounds_half_away_from_zero() {
        assert_eq!(format_plain(d("2.675")), "2.68");
        assert_eq!(format_plain(d("2.665")), "2.67");
        assert_eq!(format_plain(d("0.004")), "0.00");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(d("0")), "0.00");
        assert_eq!(format_grouped(d("999.99")), "999.99");
        assert_eq!(format_grouped(d("1000")), "1,000.00");
        assert_eq!(format_grouped(d("1234567.891")), "1,234,567.89");
        assert_eq!(format_grouped(d("-1234.5")), "-1,234.50");
    }

    #[test]
    fn test_format_european() {
        assert_eq!(format_european(d("1234.5")), "1.234,50");
        assert_eq!(format_european(d("5.0")), "5,00");
        assert_eq!(format_european(d("0")), "0,00");
        assert_eq!(format_european(d("1000000")), "1.000.000,00");
    }

    #[test]
    fn test_european_separators() {
        for raw in ["0", "0.5", "12.34", "999.999", "1000", "123456.78", "98765432.1"] {
            let out = format_european(d(raw));
            let (int_part, frac) = out.rsplit_once(',').expect("comma decimal separator");
            assert_eq!(frac.len(), 2, "{}", out);
            assert!(!int_part.contains(','), "{}", out);
            for group in int_part.split('.').skip(1) {
                assert_eq!(group.len(), 3, "{}", out);
            }
        }
    }

    #[test]
    fn test_swap_separators_twice_is_identity() {
        let grouped = format_grouped(d("1234567.5"));
        assert_eq!(swap_separators(&swap_separators(&grouped)), grouped);
    }
}
