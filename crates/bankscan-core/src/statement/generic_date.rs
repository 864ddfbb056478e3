//! Interpreter for the generic slash/dash-date statement layout.
//!
//! Lines carry a numeric date, an optionally `$`-prefixed amount, and the
//! description inline, e.g. `10/14/2025 Coffee Shop $4.50`. No sign filtering
//! applies: any amount-bearing line is accepted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{GENERIC_DATE, PLAIN_AMOUNT, WHITESPACE_RUN};
use super::LineInterpreter;
use crate::models::ParsedTransaction;

/// Interpreter for the generic numeric-date layout.
pub struct GenericDateInterpreter;

impl GenericDateInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GenericDateInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl LineInterpreter for GenericDateInterpreter {
    fn probe(&self, line: &str) -> bool {
        GENERIC_DATE.is_match(line)
    }

    fn try_parse(&self, line: &str, _lines: &[&str], _index: usize) -> Option<ParsedTransaction> {
        let caps = GENERIC_DATE.captures(line)?;
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3]);
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        let amount_match = PLAIN_AMOUNT.find(line)?;
        let amount_text = amount_match.as_str().trim_start_matches('$');
        let amount = Decimal::from_str(amount_text).ok()?;

        // Description = the line minus the date and amount substrings
        let date_text = caps.get(0)?.as_str();
        let stripped = line
            .replacen(date_text, "", 1)
            .replacen(amount_match.as_str(), "", 1)
            .replace('$', "");
        let description = WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string();

        Some(ParsedTransaction::new(date, amount, description))
    }
}

/// Two-digit years: 00-50 map to the 2000s, 51-99 to the 1900s.
fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(line: &str) -> Option<ParsedTransaction> {
        GenericDateInterpreter::new().try_parse(line, &[line], 0)
    }

    #[test]
    fn test_inline_date_description_amount() {
        let transaction = parse("10/14/2025 Coffee Shop $4.50").unwrap();
        assert_eq!(
            transaction.date,
            NaiveDate::from_ymd_opt(2025, 10, 14).unwrap()
        );
        assert_eq!(transaction.amount, Decimal::from_str("4.50").unwrap());
        assert_eq!(transaction.description, "Coffee Shop");
    }

    #[test]
    fn test_amount_without_dollar_prefix() {
        let transaction = parse("10/14/2025 Parking 12.00").unwrap();
        assert_eq!(transaction.amount, Decimal::from_str("12.00").unwrap());
        assert_eq!(transaction.description, "Parking");
    }

    #[test]
    fn test_dash_separated_date() {
        let transaction = parse("1-2-2024 Toll 3.75").unwrap();
        assert_eq!(
            transaction.date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_two_digit_year() {
        let transaction = parse("10/14/25 Deli $8.20").unwrap();
        assert_eq!(
            transaction.date,
            NaiveDate::from_ymd_opt(2025, 10, 14).unwrap()
        );

        let transaction = parse("10/14/99 Deli $8.20").unwrap();
        assert_eq!(
            transaction.date,
            NaiveDate::from_ymd_opt(1999, 10, 14).unwrap()
        );
    }

    #[test]
    fn test_no_amount_is_no_match() {
        assert!(parse("10/14/2025 Statement period").is_none());
    }

    #[test]
    fn test_invalid_calendar_date_is_no_match() {
        assert!(parse("99/14/2025 Mystery $1.00").is_none());
        assert!(parse("2/30/2025 Mystery $1.00").is_none());
    }

    #[test]
    fn test_description_collapses_whitespace() {
        let transaction = parse("10/14/2025   Grocery   Store    $45.67").unwrap();
        assert_eq!(transaction.description, "Grocery Store");
    }

    #[test]
    fn test_negative_inline_amount_still_accepted() {
        // No withdrawal filter in this layout; the sign sits outside the match
        let transaction = parse("10/14/2025 Refund -$4.50").unwrap();
        assert_eq!(transaction.amount, Decimal::from_str("4.50").unwrap());
        assert_eq!(transaction.description, "Refund -");
    }
}
