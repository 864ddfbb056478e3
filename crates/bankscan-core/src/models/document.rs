//! Imported document and processing status models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a processing run failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// Text could not be obtained from the document.
    Extraction { detail: String },

    /// Extraction exceeded the configured time budget.
    Timeout { seconds: u64 },

    /// A persistence collaborator failed mid-run.
    Persistence { detail: String },
}

/// Per-document record of whether/how the extraction-and-parse pipeline
/// last completed.
///
/// Exactly one of three shapes at any time:
/// - unprocessed: `is_processed=false`, no timestamp, no count, no failure
/// - processed: `is_processed=true`, timestamp and count set
/// - failed: `is_processed=false`, no timestamp, no count, failure retained
///
/// A zero `transaction_count` is a successful run over a statement with no
/// matching lines; it is distinct from a failed run, where the count is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    /// Whether the last run completed successfully.
    pub is_processed: bool,

    /// When the last successful run completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,

    /// Number of transactions produced by the last successful run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_count: Option<u32>,

    /// Structured reason for the last failure, if any. The external contract
    /// stays boolean + count; the reason is retained for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<FailureReason>,
}

impl ProcessingStatus {
    /// Initial state at upload time.
    pub fn unprocessed() -> Self {
        Self {
            is_processed: false,
            processed_at: None,
            transaction_count: None,
            last_failure: None,
        }
    }

    /// Record a successful run. Overwrites any previous outcome.
    pub fn mark_processed(&mut self, transaction_count: u32) {
        self.is_processed = true;
        self.processed_at = Some(Utc::now());
        self.transaction_count = Some(transaction_count);
        self.last_failure = None;
    }

    /// Record a failed run. Overwrites any previous outcome; the count is
    /// cleared rather than zeroed so failure stays distinguishable from a
    /// zero-transaction success.
    pub fn mark_failed(&mut self, reason: FailureReason) {
        self.is_processed = false;
        self.processed_at = None;
        self.transaction_count = None;
        self.last_failure = Some(reason);
    }
}

impl Default for ProcessingStatus {
    fn default() -> Self {
        Self::unprocessed()
    }
}

/// An imported statement document as held by a document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Identifier assigned by the store.
    pub id: u64,

    /// Original file name as uploaded.
    pub file_name: String,

    /// Path to the stored file on disk.
    pub file_path: String,

    /// File type (e.g. "application/pdf").
    pub file_type: String,

    /// Size of the stored file in bytes.
    pub file_size_bytes: u64,

    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,

    /// Processing lifecycle state.
    #[serde(flatten)]
    pub status: ProcessingStatus,
}
