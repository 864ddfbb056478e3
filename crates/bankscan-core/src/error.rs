//! Error types for the bankscan-core library.

use thiserror::Error;

/// Main error type for the bankscan library.
#[derive(Error, Debug)]
pub enum BankscanError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Processing pipeline error.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from one or more pages.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// I/O error while reading the document file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the document processing pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Text extraction failed; the document was marked as failed.
    #[error("extraction failed: {0}")]
    Extraction(#[source] PdfError),

    /// Extraction exceeded the configured time budget.
    #[error("extraction timed out after {0}s")]
    Timeout(u64),

    /// Another run for the same document is already in flight.
    #[error("document {0} is already being processed")]
    AlreadyProcessing(u64),

    /// The document store reported a failure.
    #[error("document store error: {0}")]
    Store(#[from] StoreError),

    /// The transaction sink reported a failure.
    #[error("transaction sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Errors reported by a document store collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No document with the given identifier.
    #[error("document {0} not found")]
    NotFound(u64),

    /// Backend failure while reading or writing a document record.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Errors reported by a transaction sink collaborator.
#[derive(Error, Debug)]
pub enum SinkError {
    /// Backend failure while persisting transactions.
    #[error("sink backend error: {0}")]
    Backend(String),
}

/// Result type for the bankscan library.
pub type Result<T> = std::result::Result<T, BankscanError>;
