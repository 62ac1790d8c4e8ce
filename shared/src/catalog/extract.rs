//! Best-effort numeric extraction from display strings
//!
//! Prices, engine sizes, mileage and load ratings are stored as formatted
//! text (`"₹1,20,000"`, `"149.5 cc"`, `"45 kmpl"`). Filtering needs numbers,
//! so every extraction here is total: anything unparsable is zero.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Extract the first numeric run from a display string
///
/// Skips to the first ASCII digit, takes digits and thousands separators,
/// then an optional fractional part. Separators are stripped before parsing.
///
/// ```
/// use rust_decimal::Decimal;
/// use shared::catalog::extract_number;
///
/// assert_eq!(extract_number("₹1,20,000"), Decimal::from(120000));
/// assert_eq!(extract_number("N/A"), Decimal::ZERO);
/// assert_eq!(extract_number(""), Decimal::ZERO);
/// ```
pub fn extract_number(text: &str) -> Decimal {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return Decimal::ZERO;
    };

    let rest = &text[start..];
    let mut digits = String::with_capacity(rest.len());
    let mut chars = rest.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '0'..='9' => digits.push(c),
            ',' => {}
            _ => break,
        }
        chars.next();
    }

    if chars.next_if_eq(&'.').is_some() && chars.peek().is_some_and(char::is_ascii_digit) {
        digits.push('.');
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            digits.push(c);
        }
    }

    Decimal::from_str(&digits).unwrap_or(Decimal::ZERO)
}

/// Parse a user-entered range bound; blank input means "no bound"
pub fn parse_bound(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(extract_number(trimmed))
    }
}

/// Leading integer of a string, `parseInt` style: digits must start the text
pub fn leading_int(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_extract_prices() {
        assert_eq!(extract_number("₹1,20,000"), dec("120000"));
        assert_eq!(extract_number("Rs. 85,500 onwards"), dec("85500"));
        assert_eq!(extract_number("₹1200 - ₹1500"), dec("1200"));
    }

    #[test]
    fn test_extract_decimals() {
        assert_eq!(extract_number("45.5 kmpl"), dec("45.5"));
        assert_eq!(extract_number("149.5cc"), dec("149.5"));
        assert_eq!(extract_number("13.6 PS @ 8000 rpm"), dec("13.6"));
        // a trailing dot is not a fraction
        assert_eq!(extract_number("12. litres"), dec("12"));
    }

    #[test]
    fn test_extract_unparsable_is_zero() {
        assert_eq!(extract_number("N/A"), Decimal::ZERO);
        assert_eq!(extract_number(""), Decimal::ZERO);
        assert_eq!(extract_number("price on request"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("   "), None);
        assert_eq!(parse_bound("50000"), Some(dec("50000")));
        assert_eq!(parse_bound("abc"), Some(Decimal::ZERO));
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("205/55 R16"), Some(205));
        assert_eq!(leading_int(" 90"), Some(90));
        assert_eq!(leading_int("R16"), None);
        assert_eq!(leading_int(""), None);
    }
}
