//! Conversion between user-entered decimal strings and integer cents.
//!
//! Parsing never goes through a float: `"33.33"` is split at the decimal point and
//! recombined as `33 * 100 + 33`, so it is exactly 3333.

use crate::model::Money;

const CENTS_PER_UNIT: i64 = 100;
const FRACTION_DIGITS: usize = 2;

/// Parses a decimal string such as `"10"`, `"10.5"` or `"$1,234.56"` into cents.
///
/// Everything except ASCII digits and `.` is discarded. The fraction is padded or
/// truncated to two digits; anything after a second decimal point is ignored.
/// Empty or digit-free input is zero. Amounts beyond `i64` saturate.
pub fn parse_decimal_to_cents(text: &str) -> Money {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut parts = cleaned.split('.');
    let units = parse_digits(parts.next().unwrap_or_default());
    let cents = match parts.next() {
        Some(fraction) => {
            let mut digits: String = fraction.chars().take(FRACTION_DIGITS).collect();
            while digits.len() < FRACTION_DIGITS {
                digits.push('0');
            }
            parse_digits(&digits)
        }
        None => 0,
    };

    Money::from_i64(units.saturating_mul(CENTS_PER_UNIT).saturating_add(cents))
}

/// Formats cents with exactly two fraction digits: `1000` -> `"10.00"`, `1` -> `"0.01"`.
pub fn format_cents_to_decimal(cents: Money) -> String {
    let amount = cents.amount();
    let sign = if amount < 0 { "-" } else { "" };
    let magnitude = amount.unsigned_abs();
    let per_unit = CENTS_PER_UNIT.unsigned_abs();
    format!(
        "{sign}{}.{:0width$}",
        magnitude / per_unit,
        magnitude % per_unit,
        width = FRACTION_DIGITS
    )
}

// Input is ASCII digits only, so the only failure is overflow.
fn parse_digits(digits: &str) -> i64 {
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<i64>().unwrap_or(i64::MAX)
}
