//! Interpreter for the named-date statement layout.
//!
//! Lines carry a weekday/month-abbreviation date plus a signed dollar amount,
//! e.g. `Tue, Oct. 14, 2025 ... -$45.67`, with the description usually on the
//! following line. Only withdrawals (`-` sign) become transactions; deposit
//! lines are intentionally discarded.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{NAMED_DATE, SIGNED_AMOUNT};
use super::LineInterpreter;
use crate::models::ParsedTransaction;

/// Lines containing these substrings are transaction-type rows in this
/// layout, not descriptions. Matching is case-sensitive, by design.
const TYPE_MARKERS: [&str; 4] = ["Deposit", "Purchase", "Correction", "Transfer"];

/// Interpreter for the named-date layout.
pub struct NamedDateInterpreter;

impl NamedDateInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NamedDateInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl LineInterpreter for NamedDateInterpreter {
    fn probe(&self, line: &str) -> bool {
        NAMED_DATE.is_match(line)
    }

    fn try_parse(&self, line: &str, lines: &[&str], index: usize) -> Option<ParsedTransaction> {
        let caps = NAMED_DATE.captures(line)?;
        let month = month_number(&caps[1]);
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        let amount_caps = SIGNED_AMOUNT.captures(line)?;
        // Deposits are never materialized in this layout
        if &amount_caps[1] != "-" {
            return None;
        }
        // Stored amount is the absolute value; the sign is consumed here
        let amount = Decimal::from_str(&amount_caps[2]).ok()?;

        let description = lookahead_description(lines, index);
        Some(ParsedTransaction::new(date, amount, description))
    }
}

/// Map a three-letter month abbreviation to its number. Unrecognized
/// abbreviations fall back to January: extraction is best-effort and a
/// wrong month beats losing the transaction.
fn month_number(abbrev: &str) -> u32 {
    match abbrev.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 1,
    }
}

/// The description usually sits on the line after the date/amount line. When
/// that line is a transaction-type row, fall back to the line two ahead; when
/// neither is usable the description is empty.
fn lookahead_description(lines: &[&str], index: usize) -> String {
    if let Some(next) = lines.get(index + 1) {
        let next = next.trim();
        if !TYPE_MARKERS.iter().any(|marker| next.contains(marker)) {
            return next.to_string();
        }
        if let Some(after) = lines.get(index + 2) {
            return after.trim().to_string();
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_lines(lines: &[&str], index: usize) -> Option<ParsedTransaction> {
        NamedDateInterpreter::new().try_parse(lines[index], lines, index)
    }

    #[test]
    fn test_withdrawal_line_with_description_below() {
        let lines = ["Tue, Oct. 14, 2025 -$45.67", "Grocery Store"];
        let transaction = parse_lines(&lines, 0).unwrap();

        assert_eq!(
            transaction.date,
            NaiveDate::from_ymd_opt(2025, 10, 14).unwrap()
        );
        assert_eq!(transaction.amount, Decimal::from_str("45.67").unwrap());
        assert_eq!(transaction.description, "Grocery Store");
    }

    #[test]
    fn test_deposit_line_discarded() {
        let lines = ["Tue, Oct. 14, 2025 +$100.00", "Grocery Store"];
        assert!(parse_lines(&lines, 0).is_none());
    }

    #[test]
    fn test_unsigned_amount_is_no_match() {
        let lines = ["Tue, Oct. 14, 2025 $45.67"];
        assert!(parse_lines(&lines, 0).is_none());
    }

    #[test]
    fn test_missing_amount_is_no_match() {
        let lines = ["Tue, Oct. 14, 2025"];
        assert!(parse_lines(&lines, 0).is_none());
    }

    #[test]
    fn test_type_marker_skipped_for_description() {
        let lines = [
            "Wed, Nov. 5, 2025 -$12.00",
            "Pos Purchase",
            "Corner Bakery",
        ];
        let transaction = parse_lines(&lines, 0).unwrap();
        assert_eq!(transaction.description, "Corner Bakery");
    }

    #[test]
    fn test_marker_at_end_of_sequence_gives_empty_description() {
        let lines = ["Wed, Nov. 5, 2025 -$12.00", "Transfer Out"];
        let transaction = parse_lines(&lines, 0).unwrap();
        assert_eq!(transaction.description, "");
    }

    #[test]
    fn test_no_following_line_gives_empty_description() {
        let lines = ["Wed, Nov. 5, 2025 -$12.00"];
        let transaction = parse_lines(&lines, 0).unwrap();
        assert_eq!(transaction.description, "");
    }

    #[test]
    fn test_weekday_optional() {
        let lines = ["Oct 14, 2025 -$9.99", "Hardware"];
        let transaction = parse_lines(&lines, 0).unwrap();
        assert_eq!(
            transaction.date,
            NaiveDate::from_ymd_opt(2025, 10, 14).unwrap()
        );
    }

    #[test]
    fn test_invalid_calendar_date_is_no_match() {
        // Feb 30 passes the regex but fails calendar validation
        let lines = ["Mon, Feb. 30, 2025 -$5.00", "Somewhere"];
        assert!(parse_lines(&lines, 0).is_none());
    }

    #[test]
    fn test_month_fallback_defaults_to_january() {
        assert_eq!(month_number("xyz"), 1);
        assert_eq!(month_number("Oct"), 10);
        assert_eq!(month_number("DEC"), 12);
    }
}
