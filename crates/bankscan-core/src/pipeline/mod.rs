//! Document processing pipeline.
//!
//! Orchestrates one extraction-and-parse run per document: read the stored
//! file, extract its text, parse transactions, persist them through the
//! transaction sink, and report the outcome to the document store. Runs for
//! the same document are serialized by a single-flight guard; overall
//! concurrency is bounded by a semaphore.

mod runner;

pub use runner::DocumentPipeline;

use std::future::Future;
use std::path::Path;

use crate::error::{SinkError, StoreError};
use crate::models::{FailureReason, ParsedTransaction, StoredDocument, StoredTransaction};
use crate::pdf::{self, PdfExtractor, PdfProcessor};

/// Status update reported to the document store at the end of a run.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// Whether the run completed successfully.
    pub is_processed: bool,

    /// Number of transactions persisted, present only on success.
    pub transaction_count: Option<u32>,

    /// Structured failure reason, present only on failure.
    pub failure: Option<FailureReason>,
}

impl StatusUpdate {
    /// A successful run that persisted `count` transactions (possibly zero).
    pub fn processed(count: u32) -> Self {
        Self {
            is_processed: true,
            transaction_count: Some(count),
            failure: None,
        }
    }

    /// A failed run. The count stays absent so failure remains
    /// distinguishable from a zero-transaction success.
    pub fn failed(reason: FailureReason) -> Self {
        Self {
            is_processed: false,
            transaction_count: None,
            failure: Some(reason),
        }
    }
}

/// Persistence collaborator holding imported document records.
pub trait DocumentStore: Send + Sync {
    /// Fetch a document record by identifier.
    fn document(
        &self,
        id: u64,
    ) -> impl Future<Output = Result<StoredDocument, StoreError>> + Send;

    /// Apply a processing status update to a document record.
    fn update_status(
        &self,
        id: u64,
        update: StatusUpdate,
    ) -> impl Future<Output = Result<StoredDocument, StoreError>> + Send;
}

/// Persistence collaborator accepting parsed transactions in bulk. The
/// length of the returned batch feeds the document's transaction count.
pub trait TransactionSink: Send + Sync {
    fn create_bulk(
        &self,
        transactions: &[ParsedTransaction],
    ) -> impl Future<Output = Result<Vec<StoredTransaction>, SinkError>> + Send;
}

/// Produces the text blob for a stored document file.
///
/// The production implementation is [`PdfTextSource`]; tests swap in fakes
/// so pipeline behavior can be exercised without real PDF fixtures.
pub trait TextSource: Send + Sync {
    fn statement_text(&self, path: &Path) -> pdf::Result<String>;
}

/// [`TextSource`] backed by the PDF extractor, reading from disk.
pub struct PdfTextSource {
    max_pages: usize,
}

impl PdfTextSource {
    /// `max_pages` limits extraction (0 = unlimited).
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }
}

impl TextSource for PdfTextSource {
    fn statement_text(&self, path: &Path) -> pdf::Result<String> {
        let data = std::fs::read(path)?;
        let mut extractor = PdfExtractor::new().with_max_pages(self.max_pages);
        extractor.load(&data)?;
        extractor.extract_text()
    }
}
