//! Transaction data models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A transaction reconstructed from statement text, prior to persistence.
///
/// The amount is always non-negative: sign information is consumed during
/// parsing (withdrawal filtering) and not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// Transaction date.
    pub date: NaiveDate,

    /// Transaction amount, non-negative, two fractional digits.
    pub amount: Decimal,

    /// Free-text description, trimmed. May be empty.
    pub description: String,
}

impl ParsedTransaction {
    pub fn new(date: NaiveDate, amount: Decimal, description: impl Into<String>) -> Self {
        Self {
            date,
            amount,
            description: description.into(),
        }
    }
}

/// A transaction as persisted by a transaction sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTransaction {
    /// Identifier assigned by the sink.
    pub id: u64,

    /// The parsed transaction that was stored.
    #[serde(flatten)]
    pub transaction: ParsedTransaction,
}
