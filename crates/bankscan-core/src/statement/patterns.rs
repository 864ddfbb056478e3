//! Common regex patterns for statement line parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Named-date layout: optional weekday abbreviation, month abbreviation
    // (optionally followed by a period), 1-2 digit day, 4-digit year.
    // e.g. "Tue, Oct. 14, 2025" or "Oct 14 2025"
    pub static ref NAMED_DATE: Regex = Regex::new(
        r"(?:(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun),?\s+)?(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\.?\s+(\d{1,2}),?\s+(\d{4})"
    ).unwrap();

    // Signed dollar amount on a named-date line: +$12.34 or -$12.34
    pub static ref SIGNED_AMOUNT: Regex = Regex::new(
        r"([+-])\$(\d+\.\d{2})"
    ).unwrap();

    // Generic slash/dash-delimited numeric date: 10/14/2025, 1-2-24
    pub static ref GENERIC_DATE: Regex = Regex::new(
        r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b"
    ).unwrap();

    // Plain or $-prefixed amount with two fractional digits
    pub static ref PLAIN_AMOUNT: Regex = Regex::new(
        r"\$?\d+\.\d{2}"
    ).unwrap();

    // Runs of whitespace, for description cleanup
    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}
