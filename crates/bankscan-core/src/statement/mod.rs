//! Statement line parsing module.
//!
//! Reconstructs discrete transactions (date, amount, description) from the
//! unstructured text of a bank statement. Two known layouts are supported,
//! each behind a [`LineInterpreter`]; interpreters are probed in a fixed
//! priority order and at most one runs per line. Lines matching no layout
//! are silently skipped, which is the common case.

mod generic_date;
mod named_date;
pub mod patterns;

pub use generic_date::GenericDateInterpreter;
pub use named_date::NamedDateInterpreter;

use tracing::debug;

use crate::models::ParsedTransaction;

/// A line interpreter for one known statement layout.
pub trait LineInterpreter {
    /// Fast regex probe: does this layout plausibly apply to the line?
    fn probe(&self, line: &str) -> bool;

    /// Attempt to produce a transaction from the line plus surrounding
    /// context (the full line sequence and the line's index, for lookahead).
    /// Returns `None` when the line does not yield a transaction; parsing
    /// problems never escape an interpreter.
    fn try_parse(&self, line: &str, lines: &[&str], index: usize) -> Option<ParsedTransaction>;
}

/// Parses a statement text blob into transactions.
///
/// Adding support for a third bank layout means adding one interpreter to
/// the priority list, not branching deeper.
pub struct StatementParser {
    interpreters: Vec<Box<dyn LineInterpreter + Send + Sync>>,
}

impl StatementParser {
    /// Create a parser with the default interpreters, named-date first.
    pub fn new() -> Self {
        Self {
            interpreters: vec![
                Box::new(NamedDateInterpreter::new()),
                Box::new(GenericDateInterpreter::new()),
            ],
        }
    }

    /// Parse the full text blob into transactions, in scan order.
    ///
    /// Pure: no state survives between calls, so parsing the same blob twice
    /// yields identical lists. No deduplication or sorting is applied.
    pub fn parse(&self, text: &str) -> Vec<ParsedTransaction> {
        let lines: Vec<&str> = text.split('\n').filter(|l| !l.is_empty()).collect();
        let mut transactions = Vec::new();

        for (index, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            // First matching probe wins; at most one interpreter per line.
            for interpreter in &self.interpreters {
                if interpreter.probe(line) {
                    if let Some(transaction) = interpreter.try_parse(line, &lines, index) {
                        transactions.push(transaction);
                    }
                    break;
                }
            }
        }

        debug!(
            "parsed {} transactions from {} lines",
            transactions.len(),
            lines.len()
        );
        transactions
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}
